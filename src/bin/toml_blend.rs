use blend_client::core::endpoints::plan;
use blend_client::core::ConfigProvider;
use blend_client::utils::{logger, validation::Validate};
use blend_client::{BlendEngine, BlendError, BlendJob, HttpBlendApi, LocalStorage, OutputMode, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-blend")]
#[command(about = "Blend client driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "blend.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override output mode from config
    #[arg(long, value_enum)]
    output_mode: Option<OutputMode>,

    /// Accept invalid TLS certificates regardless of config
    #[arg(long)]
    insecure_skip_verify: bool,

    /// Print the run report as JSON
    #[arg(long)]
    summary_json: bool,

    /// Dry run - show the planned requests without sending them
    #[arg(long)]
    dry_run: bool,
}

fn fail(e: &BlendError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based blend client");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 命令列覆蓋設定
    if let Some(mode) = args.output_mode {
        config.output.mode = Some(mode);
        tracing::info!("🔧 Output mode overridden to: {:?}", mode);
    }
    if args.insecure_skip_verify {
        config.server.insecure_skip_verify = Some(true);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be sent");
        if let Err(e) = perform_dry_run(&config) {
            fail(&e);
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let api = match HttpBlendApi::new(&config) {
        Ok(api) => api,
        Err(e) => fail(&e),
    };
    let engine = BlendEngine::new_with_monitoring(
        api,
        LocalStorage::default(),
        BlendJob::from_config(&config),
        monitor_enabled,
    );

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Blend completed in {:?}", report.elapsed);
            println!("📁 Output saved to: {}", report.output_path);
            if args.summary_json {
                println!("{}", report.to_json()?);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!(
        "  Server: {}://{}:{}/{}",
        config.scheme(),
        config.host(),
        config.port(),
        config.api_prefix()
    );
    tracing::info!("  Resource: {}", config.resource());
    tracing::info!(
        "  API key: {}",
        if config.api_key().is_some() { "set" } else { "none" }
    );
    tracing::info!("  Verify TLS: {}", !config.insecure_skip_verify());
    tracing::info!("  Input files: {}", config.input_files().len());
    tracing::info!("  Output: {} ({:?})", config.output_path(), config.output_mode());
}

fn perform_dry_run(config: &TomlConfig) -> blend_client::Result<()> {
    println!("Planned requests:");
    for request in plan(config)? {
        println!("  {}", request);
    }
    Ok(())
}
