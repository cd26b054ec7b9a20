use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blabla::cli::{self, EntityKind};
use blabla::config::{self, Config, LogFormat};
use blabla::dto::ToWire;

#[derive(Parser)]
#[command(name = "blabla")]
#[command(about = "Inspect and convert assistant wire payloads")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a payload and print its normalized wire form
    Check {
        /// Entity the payload should decode as
        #[arg(value_enum)]
        kind: EntityKind,
        /// JSON file to read; stdin when omitted
        path: Option<PathBuf>,
    },
    /// Build a temp-file upload payload from a file on disk
    Pack {
        path: PathBuf,
    },
    /// Decode a temp-file upload payload and write its content
    Unpack {
        /// JSON file to read; stdin when omitted
        path: Option<PathBuf>,
        /// Where to write the decoded bytes
        #[arg(long, required_unless_present = "header_only")]
        out: Option<PathBuf>,
        /// Print the header view instead of writing the content
        #[arg(long)]
        header_only: bool,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blabla=info".into());
    // Logs go to stderr so stdout stays a clean JSON stream.
    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    // Subscriber first, so config warnings are not lost.
    init_tracing(config::log_format_from_env());
    let config = Config::from_env();

    match args.command {
        Command::Check { kind, path } => {
            let input = cli::read_input(path.as_deref(), config.output.max_input_bytes)?;
            match cli::check(kind, &input) {
                Ok(wire) => {
                    println!("{}", cli::render(&wire, config.output.pretty)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    tracing::warn!("{:?} payload rejected: {}", kind, err.message);
                    println!("{}", cli::render(&err.to_wire(), config.output.pretty)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Pack { path } => {
            let file = cli::pack(&path)?;
            println!("{}", cli::render(&file.to_wire(), config.output.pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Unpack {
            path,
            out,
            header_only,
        } => {
            let input = cli::read_input(path.as_deref(), config.output.max_input_bytes)?;
            if header_only {
                let header = cli::header_of(&input)?;
                println!("{}", cli::render(&header, config.output.pretty)?);
            } else if let Some(out) = out {
                let header = cli::unpack(&input, &out)?;
                tracing::info!(
                    "Wrote {} bytes ({}) to {}",
                    header.length,
                    header.file_extension(),
                    out.display()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
