use anyhow::Context;
use clap::Parser;
use storm_etl::core::ConfigProvider;
use storm_etl::utils::{logger, validation::Validate};
use storm_etl::{EtlEngine, LocalStorage, StormPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Storm damage report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "storm-report.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the ranking size from config
    #[arg(long)]
    top_n: Option<usize>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if let Some(top_n) = args.top_n {
        config.rank.top_n = Some(top_n);
        tracing::info!("🔧 Ranking size overridden to: {}", top_n);
    }

    config.validate().context("invalid configuration")?;
    tracing::info!("✅ Configuration loaded and validated");

    if args.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = StormPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Report completed");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("💡 {}", e.recovery_suggestion());
            Err(e.into())
        }
    }
}

fn print_dry_run(config: &TomlConfig) {
    let columns = config.columns();

    println!("🔍 Dry run: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  {}", description);
    }
    println!();
    println!("📡 Source: {}", config.source());
    println!("  Timeout: {}s", config.request_timeout_seconds());
    println!(
        "  Columns: {}, {}, {}, {}/{}, {}/{}",
        columns.category,
        columns.fatalities,
        columns.injuries,
        columns.property_damage,
        columns.property_damage_unit,
        columns.crop_damage,
        columns.crop_damage_unit
    );
    println!();
    println!("⚙️ Processing:");
    println!("  Top N per metric: {}", config.top_n());
    println!("  Malformed rows: {:?}", config.bad_row_policy());
    println!("  Missing event type label: {:?}", config.missing_category());
    println!();
    println!("💾 Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    match config.archive_name() {
        Some(name) => println!("  Bundled as: {}", name),
        None => println!("  Written as individual files"),
    }
}
