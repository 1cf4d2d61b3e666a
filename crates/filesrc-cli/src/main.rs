mod logging;

use clap::{Parser, Subcommand};
use filesrc_config::AppConfig;
use filesrc_core::{LogLevel, LogMessage, Message, Registry, SourceConfig};
use filesrc_local_connector::local_source;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "filesrc")]
#[command(about = "File based data source connector", long_about = None)]
struct Cli {
    /// Path to application configuration directory
    #[arg(long, default_value = "config", global = true)]
    config_dir: String,

    /// Source to run, defaults to the configured default source
    #[arg(short, long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the connector specification
    Spec,

    /// Check that the configuration gives access to the files
    Check {
        /// Path to the connector configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Read records from every file matching the path pattern
    Read {
        /// Path to the connector configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List registered sources
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app_config = AppConfig::load(&cli.config_dir)?;
    logging::init_tracing(&app_config.logging)?;

    let mut registry = Registry::new();
    registry.register(local_source());

    let source_name = cli.source.unwrap_or(app_config.default_source);

    match cli.command {
        Commands::Spec => {
            let source = registry.get(&source_name)?;
            emit(&Message::Spec {
                spec: source.spec(),
            })?;
        }

        Commands::Check { config } => {
            let source = registry.get(&source_name)?;
            let config = load_source_config(&config)?;

            let result = source.check_connection(&config).await?;
            emit(&Message::ConnectionStatus {
                connection_status: result.to_status(),
            })?;
        }

        Commands::Read { config } => {
            let source = registry.get(&source_name)?;
            let config = load_source_config(&config)?;

            let mut stdout = std::io::stdout();
            let outcome = source
                .read(&config, |record| {
                    let line = Message::Record { record }.to_json_line()?;
                    writeln!(stdout, "{}", line)?;
                    Ok(())
                })
                .await;

            let records = match outcome {
                Ok(records) => records,
                Err(e) => {
                    error!(source = %source_name, error = %e.report(), "Read failed");
                    emit(&Message::Log {
                        log: LogMessage {
                            level: LogLevel::Error,
                            message: e.to_string(),
                        },
                    })?;
                    return Err(e.into());
                }
            };

            info!(source = %source_name, records, "Read finished");
        }

        Commands::Sources => {
            for name in registry.list() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn load_source_config(path: &Path) -> anyhow::Result<SourceConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(SourceConfig::from_json_str(&content)?)
}

fn emit(message: &Message) -> anyhow::Result<()> {
    println!("{}", message.to_json_line()?);
    Ok(())
}
