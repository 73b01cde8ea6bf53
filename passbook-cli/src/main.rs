use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use passbook_core::ParseError;
use passbook_ingest::{ParserService, preview_lines};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

mod config;
mod logging;
mod output;
mod state;

use config::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PASSBOOK_BUILD_SHA"), ")"),
    about = "Turn bank statement PDFs and CSV exports into normalized transactions"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG and the config file)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement and print its transactions
    Parse {
        file: PathBuf,

        /// Output format (default: [output] format from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the raw extracted text of a statement
    Text {
        file: PathBuf,

        /// Number of lines (default: [preview] lines from config)
        #[arg(long)]
        lines: Option<usize>,
    },

    /// Print the bank a statement belongs to
    Detect { file: PathBuf },

    /// List the bank profiles and their detection keywords
    Banks,

    /// Manage ~/.passbook/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init(&cfg.log.level, cli.verbose);

    let service = ParserService::new();

    match cli.command {
        Command::Parse {
            file,
            format,
            output,
        } => {
            let format = format.unwrap_or(cfg.output.format);
            parse(&service, &file, format, output.as_deref(), cfg.preview.lines)?;
        }

        Command::Text { file, lines } => {
            let (bytes, name) = read_input(&file)?;
            let text = service.extract_text(&bytes, &name).map_err(fatal)?;
            for line in preview_lines(&text, lines.unwrap_or(cfg.preview.lines)) {
                println!("{line}");
            }
        }

        Command::Detect { file } => {
            let (bytes, name) = read_input(&file)?;
            let id = service.detect_bank(&bytes, &name).map_err(fatal)?;
            match service.registry().get(id) {
                Some(profile) => println!("{id} ({})", profile.name()),
                None => println!("{id}"),
            }
        }

        Command::Banks => {
            for p in service.registry().profiles() {
                println!("{:<8} {:<22} {}", p.id(), p.name(), p.keywords().join(", "));
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg)?),
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn parse(
    service: &ParserService,
    file: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    preview: usize,
) -> Result<()> {
    let (bytes, name) = read_input(file)?;

    let statement = match service.parse_statement(&bytes, &name) {
        Ok(statement) => statement,
        Err(ParseError::NoTransactionsFound { bank, preview: lines }) => {
            warn!(file = %file.display(), %bank, "no transactions found");
            eprintln!("No transactions found in {} (bank: {bank}). Extracted text:", file.display());
            for line in lines.iter().take(preview) {
                eprintln!("  {line}");
            }
            return Ok(());
        }
        Err(e) => return Err(fatal(e)),
    };

    for d in &statement.diagnostics {
        warn!("{d}");
    }

    let rendered = output::render(&statement.records, format)?;
    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("write {}", path.display()))?;
            eprintln!(
                "Wrote {} transactions ({}) to {}",
                statement.records.len(),
                statement.bank,
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn read_input(file: &Path) -> Result<(Vec<u8>, String)> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    let bytes = fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((bytes, name))
}

fn fatal(e: ParseError) -> anyhow::Error {
    anyhow::anyhow!("{e} [{}]", e.kind().as_str())
}
