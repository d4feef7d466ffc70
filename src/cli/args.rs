use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Location of the windup rulesets checkout (must contain `rules/`)
    pub windup_root: PathBuf,

    /// Directory to write analyzer rulesets under
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Identifier prefix substituted for the windup root in rule ids
    #[arg(long)]
    pub source_prefix: Option<String>,

    /// Path to config YAML file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the parsed source rulesets as YAML to this directory
    #[arg(long)]
    pub dump_source: Option<PathBuf>,

    /// Write all diagnostics as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging for internal details
    #[arg(short, long)]
    pub debug: bool,
}
