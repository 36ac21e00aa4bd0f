//! metad command line interface

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metad::cli::commands::{describe, export, validate};
use metad::cli::logging;
use metad::connectors::{DEFAULT_PORT, MysqlConfig};

#[derive(Parser)]
#[command(
    name = "metad",
    version,
    about = "Describe relational datasets with validated metadata documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a metadata file
    Describe {
        /// Path to metadata JSON file
        json: PathBuf,
    },
    /// Validate one or more metadata files
    Validate {
        /// Paths to metadata JSON files
        #[arg(required = true)]
        jsons: Vec<PathBuf>,
    },
    /// Export a MySQL database to metadata.json and CSV files
    Mysql {
        /// TOML file with host, port, user, password and database
        #[arg(long, conflicts_with_all = ["host", "port", "user", "password", "database"])]
        config: Option<PathBuf>,
        #[arg(long, required_unless_present = "config")]
        host: Option<String>,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, required_unless_present = "config")]
        user: Option<String>,
        #[arg(long, required_unless_present = "config")]
        password: Option<String>,
        #[arg(long, required_unless_present = "config")]
        database: Option<String>,
        /// Output directory (defaults to the database name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a database of the public relational dataset repository
    Rdr {
        /// Database name
        #[arg(long)]
        database: String,
        /// Output directory (defaults to the database name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Describe { json } => describe::handle_describe(&json)
            .with_context(|| format!("Failed to describe {}", json.display()))?,
        Commands::Validate { jsons } => validate::handle_validate(&jsons)?,
        Commands::Mysql {
            config,
            host,
            port,
            user,
            password,
            database,
            output,
        } => {
            let config = match config {
                Some(path) => MysqlConfig::from_toml_file(&path)
                    .with_context(|| format!("Invalid config file {}", path.display()))?,
                None => MysqlConfig::new(
                    host.unwrap_or_default(),
                    user.unwrap_or_default(),
                    password.unwrap_or_default(),
                    database.unwrap_or_default(),
                )
                .with_port(port),
            };
            let output = output.unwrap_or_else(|| PathBuf::from(&config.database));
            let database = config.database.clone();
            export::handle_mysql(config, &output)
                .with_context(|| format!("Failed to export MySQL database {}", database))?
        }
        Commands::Rdr { database, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&database));
            export::handle_rdr(&database, &output).with_context(|| {
                format!("Failed to export {} from the relational repository", database)
            })?
        }
    }
    Ok(())
}
