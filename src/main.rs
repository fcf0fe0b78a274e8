use blend_client::utils::{logger, validation::Validate};
use blend_client::{BlendEngine, BlendError, BlendJob, CliConfig, HttpBlendApi, LocalStorage};
use clap::Parser;

fn exit_with(e: &BlendError) -> ! {
    tracing::error!(
        "❌ Blend run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting blend-client");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let api = match HttpBlendApi::new(&config) {
        Ok(api) => api,
        Err(e) => exit_with(&e),
    };
    let engine = BlendEngine::new_with_monitoring(
        api,
        LocalStorage::default(),
        BlendJob::from_config(&config),
        config.monitor,
    );

    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                "✅ Blend completed: {} file(s) uploaded in {:?}",
                report.uploaded.len(),
                report.elapsed
            );
            if config.summary_json {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!("Could not serialize run report: {}", e),
                }
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
