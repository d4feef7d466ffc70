mod args;
mod helpers;

pub use args::Cli;
pub use helpers::{resolve_config, run_conversion, Summary};
