use clap::Parser;
use mc_pricer::config::scenario::ScenarioConfig;
use mc_pricer::domain::ports::ConfigProvider;
use mc_pricer::utils::{logger, validation::Validate};
use mc_pricer::{LocalStorage, PricingEngine, PricingPipeline};

#[derive(Parser)]
#[command(name = "scenario-pricer")]
#[command(about = "Monte Carlo option pricing driven by a TOML scenario file")]
struct Args {
    /// Path to the TOML scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the monitoring setting from the scenario
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be priced without simulating
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting scenario-based pricer");
    tracing::info!("📁 Loading scenario from: {}", args.config);

    let config = match ScenarioConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load scenario file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Scenario loaded and validated successfully");

    display_scenario_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No simulation will run");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PricingPipeline::new(storage, config);

    let engine = PricingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Pricing run completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Pricing run completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Pricing run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                mc_pricer::utils::error::ErrorSeverity::Low => 0,
                mc_pricer::utils::error::ErrorSeverity::Medium => 2,
                mc_pricer::utils::error::ErrorSeverity::High => 1,
                mc_pricer::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_scenario_summary(config: &ScenarioConfig) {
    tracing::info!("📋 Scenario: {} (v{})", config.scenario.name, config.scenario.version);
    tracing::info!("   {}", config.scenario.description);
    tracing::info!(
        "   Market: spot={}, vol={}, rate={}, T={}y",
        config.market.spot,
        config.market.volatility,
        config.market.risk_free_rate,
        config.market.time_to_expiry
    );
    tracing::info!(
        "   Simulation: {} paths, {}% confidence, seed={:?}",
        config.simulation.paths,
        config.confidence_level().percent(),
        config.simulation.seed
    );
    tracing::info!("   Instruments: {}", config.instruments.len());
    tracing::info!("   Output: {}", config.output_path());
}

fn perform_dry_run(config: &ScenarioConfig) {
    println!("Dry run for scenario '{}':", config.scenario.name);
    for instrument in &config.instruments {
        // validate() already proved these parse
        match instrument.to_spec() {
            Ok(spec) => println!(
                "  - {} ({:?} {:?}, strike {})",
                spec.label, spec.kind, spec.style, spec.strike
            ),
            Err(e) => println!("  - {} (invalid: {})", instrument.label, e),
        }
    }
    let total_paths = config.simulation.paths * config.instruments.len() as u64;
    println!(
        "Would simulate {} paths across {} instruments.",
        total_paths,
        config.instruments.len()
    );
}
