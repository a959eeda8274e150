use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

mod cli;
mod commands;
mod config;

use commands::value::TypeContext;

#[derive(Parser)]
#[command(name = "cqlbridge")]
#[command(about = "cqlbridge - CQL value codecs and schema descriptions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: cli::OutputFormat,

    /// Override the configured native protocol version (2-5)
    #[arg(long, value_name = "VERSION", value_parser = cli::parse_protocol_version)]
    protocol_version: Option<cqlbridge_core::ProtocolVersion>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a keyspace with its types and tables
    DescribeKeyspace {
        /// Catalog snapshot (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        keyspace: String,
    },
    /// Describe a single table
    DescribeTable {
        /// Catalog snapshot (JSON)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        keyspace: String,
        table: String,
    },
    /// Encode a JSON-tagged value, printing hex bytes
    Encode {
        /// Column type, e.g. "map<text, int>"
        #[arg(long = "type", value_name = "TYPE")]
        column_type: String,
        /// Catalog used to resolve user-defined types
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        #[arg(long)]
        keyspace: Option<String>,
        /// Value such as {"int":1} or "null"
        value: String,
    },
    /// Decode hex bytes into a JSON-tagged value
    Decode {
        #[arg(long = "type", value_name = "TYPE")]
        column_type: String,
        #[arg(long, value_enum, default_value = "client")]
        source: cli::SourceArg,
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        #[arg(long)]
        keyspace: Option<String>,
        hex: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::Config::load(cli.config)?;
    if let Some(version) = cli.protocol_version {
        config.core.codec.protocol_version = version;
    }

    // Initialize logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => config.logging.level.as_str(),
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!(
        "Starting cqlbridge v{} (protocol {})",
        env!("CARGO_PKG_VERSION"),
        config.core.codec.protocol_version
    );

    match cli.command {
        Commands::DescribeKeyspace { catalog, keyspace } => commands::describe::describe_keyspace(
            &catalog,
            &keyspace,
            &config.core.schema,
            cli.format,
        ),
        Commands::DescribeTable {
            catalog,
            keyspace,
            table,
        } => commands::describe::describe_table(
            &catalog,
            &keyspace,
            &table,
            &config.core.schema,
            cli.format,
        ),
        Commands::Encode {
            column_type,
            catalog,
            keyspace,
            value,
        } => commands::value::encode(
            &column_type,
            &value,
            &TypeContext {
                catalog: catalog.as_deref(),
                keyspace: keyspace.as_deref(),
            },
            &config.core.codec,
        ),
        Commands::Decode {
            column_type,
            source,
            catalog,
            keyspace,
            hex,
        } => commands::value::decode(
            &column_type,
            &hex,
            source.into(),
            &TypeContext {
                catalog: catalog.as_deref(),
                keyspace: keyspace.as_deref(),
            },
            &config.core.codec,
            cli.format,
        ),
    }
}
