//! wikitex CLI - convert rendered wiki article HTML to LaTeX

use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wikitex::{html_to_latex, ConversionError, ConversionResult, ConvertOptions};

#[derive(Parser)]
#[command(name = "h2l")]
#[command(version)]
#[command(about = "Convert rendered wiki article HTML to LaTeX", long_about = None)]
struct Cli {
    /// Input HTML file (reads from stdin if not provided)
    input_file: Option<PathBuf>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page URL used to resolve relative links
    #[arg(short, long)]
    base_url: Option<String>,

    /// Interleave debug comments into the output and log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// TOML file with conversion options; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Table width as a fraction of \linewidth
    #[arg(long)]
    table_width: Option<f64>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_options(cli: &Cli) -> ConversionResult<ConvertOptions> {
    let mut options = match &cli.config {
        Some(path) => ConvertOptions::from_file(path)?,
        None => ConvertOptions::default(),
    };
    if let Some(base_url) = &cli.base_url {
        options.base_url = Some(base_url.clone());
    }
    if cli.verbose {
        options.verbose = true;
    }
    if let Some(table_width) = cli.table_width {
        options.table_width = table_width;
    }
    options.validate()?;
    Ok(options)
}

fn read_input(path: Option<&PathBuf>) -> ConversionResult<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| ConversionError::IoError {
            message: format!("{}: {}", path.display(), e),
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run(cli: &Cli) -> ConversionResult<()> {
    let options = load_options(cli)?;
    let input = read_input(cli.input_file.as_ref())?;

    // Nothing is written unless the whole document converted
    let latex = html_to_latex(&input, &options)?;

    match &cli.output {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            file.write_all(latex.as_bytes())?;
            eprintln!("✓ Output written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(latex.as_bytes())?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        // Markup errors are reported against the input they came from
        match cli.input_file.as_ref().filter(|_| err.is_document_error()) {
            Some(path) => eprintln!("error: {}: {}", path.display(), err),
            None => eprintln!("error: {}", err),
        }
        std::process::exit(1);
    }
}
