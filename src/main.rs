use anyhow::Result;
use clap::Parser;
use windup_rulesets_yaml::cli::{resolve_config, run_conversion, Cli};

fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = resolve_config(&cli)?;

    println!("📂 Windup location: {}", cli.windup_root.display());
    println!("📝 Output directory: {}", config.output.display());

    let summary = run_conversion(&cli.windup_root, &config)?;

    println!(
        "✅ Converted {} rules from {} rulesets into {} files ({} rules skipped, {} diagnostics)",
        summary.converted,
        summary.rulesets,
        summary.written,
        summary.skipped,
        summary.diagnostics.len()
    );
    if let Some(report) = &config.report {
        println!("📋 Diagnostics written to {}", report.display());
    }

    Ok(())
}
