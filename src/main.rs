//! EMON Studio CLI
//!
//! Reads EMON/EDP post-processed views, rebuilds the top-down metric
//! hierarchy, expands metric formulas and compresses CPU core lists.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use emon_studio::aggregator::Platform;
use emon_studio::commands::{
    execute_combine, execute_formulas, execute_topdown, execute_view, CombineArgs, TopdownArgs,
    ViewArgs,
};
use emon_studio::parser::CoreSet;
use emon_studio::reader::{Scope, ViewKind};
use emon_studio::utils::config::{ReaderConfig, DEFAULT_TOPDOWN_PREFIX, SCHEMA_VERSION};

/// EMON Studio - EDP view reader and top-down explorer
#[derive(Parser, Debug)]
#[command(name = "emon-studio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Canonicalize a core list such as "0,1,2,5" or "3-0"
    Cores {
        /// Core list expression
        set: String,

        /// Print every core instead of the compressed form
        #[arg(long)]
        expand: bool,
    },

    /// Print one view of a run
    View {
        /// Run directory or workbook
        path: PathBuf,

        /// View scope (system, socket, core, thread)
        #[arg(short, long, default_value = "system")]
        scope: Scope,

        /// View kind (summary, detail)
        #[arg(short, long, default_value = "summary")]
        kind: ViewKind,

        /// Rows to keep
        #[arg(long, value_delimiter = ',')]
        rows: Option<Vec<String>>,

        /// Columns to keep
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Keep only these cores' columns (core scope)
        #[arg(long)]
        cores: Option<String>,

        /// Socket the --cores list belongs to
        #[arg(long, default_value = "0")]
        socket: u32,

        #[command(flatten)]
        reader: ReaderFlags,

        /// Export the loaded view as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print the top-down metric hierarchy of a run
    Topdown {
        /// Run directory or workbook
        path: PathBuf,

        #[arg(short, long, default_value = "system")]
        scope: Scope,

        /// Column to display
        #[arg(short, long, default_value = "aggregated")]
        column: String,

        /// Metric name prefix
        #[arg(long, default_value = DEFAULT_TOPDOWN_PREFIX)]
        prefix: String,

        /// Print a platform's breakdown groups (skx, icx)
        #[arg(long)]
        platform: Option<Platform>,

        /// Print only this metric's subtree
        #[arg(long)]
        node: Option<String>,

        #[command(flatten)]
        reader: ReaderFlags,
    },

    /// Expand every formula of an EDP metric catalog
    Formulas {
        /// Metric catalog XML
        catalog: PathBuf,

        /// Write expansions to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Put one column of several runs side by side
    Combine {
        /// Run directories or workbooks
        #[arg(required = true)]
        runs: Vec<PathBuf>,

        #[arg(short, long, default_value = "system")]
        scope: Scope,

        #[arg(short, long, default_value = "aggregated")]
        column: String,

        #[command(flatten)]
        reader: ReaderFlags,

        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Reader options shared by the view commands
#[derive(clap::Args, Debug)]
struct ReaderFlags {
    /// Fail unless the run's processing marker is present
    #[arg(long)]
    require_marker: bool,

    /// Forward-fill missing values in detail views
    #[arg(long)]
    forward_fill: bool,
}

impl From<ReaderFlags> for ReaderConfig {
    fn from(flags: ReaderFlags) -> Self {
        ReaderConfig::new()
            .with_marker_required(flags.require_marker)
            .with_forward_fill(flags.forward_fill)
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Cores { set, expand } => {
            let cores = CoreSet::parse(&set)?;
            if expand {
                println!("{}", cores.expanded());
            } else {
                println!("{}", cores.compress());
            }
        }

        Commands::View {
            path,
            scope,
            kind,
            rows,
            columns,
            cores,
            socket,
            reader,
            json,
        } => {
            let args = ViewArgs {
                source: path,
                scope,
                kind,
                rows,
                columns,
                cores: cores.map(|c| (socket, c)),
                reader: reader.into(),
                output_json: json,
            };
            execute_view(args)?;
        }

        Commands::Topdown {
            path,
            scope,
            column,
            prefix,
            platform,
            node,
            reader,
        } => {
            let args = TopdownArgs {
                source: path,
                scope,
                column,
                prefix,
                platform,
                node,
                reader: reader.into(),
            };
            execute_topdown(args)?;
        }

        Commands::Formulas { catalog, output } => {
            execute_formulas(&catalog, output.as_deref())?;
        }

        Commands::Combine {
            runs,
            scope,
            column,
            reader,
            json,
        } => {
            let args = CombineArgs {
                runs,
                scope,
                column,
                reader: reader.into(),
                output_json: json,
            };
            execute_combine(args)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("EMON Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Table Export Schema: v{}", SCHEMA_VERSION);
}
