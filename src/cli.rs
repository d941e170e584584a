use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "steel-tables",
    version,
    about = "Terminal viewer for structural steel section property tables."
)]
pub struct CliArgs {
    /// Table to print once and exit (for example: PFC300, UB, rhs450)
    pub table: Option<String>,

    /// Directory holding the <NAME>_PROPS.json table files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to steel-tables.yaml or ~/.config/steel-tables/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List available tables and exit
    #[arg(short, long, conflicts_with_all = ["table", "find"])]
    pub list: bool,

    /// Find sections across all tables, terms separated by '+' (for example: 300PFC+310UB)
    #[arg(short, long, conflicts_with = "table")]
    pub find: Option<String>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Write logs to this file instead of discarding them
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
