use moneyfit::context::*;
use moneyfit::logger::*;
use moneyfit::settings::*;

// $ cargo run --bin session_demo -- --settings=settings/dev.toml
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let context = AppContext::try_new(&project_settings)?;
    context.restore().await;
    info!(flow = ?context.flow(), "restored");

    // Without a reachable backend this surfaces as a network error.
    match context.analysis.daily_recommendation().await {
        Ok(recommendation) => info!(?recommendation, "daily recommendation"),
        Err(e) => warn!(user_message = e.user_message(), "daily recommendation failed: {}", e),
    }

    let shutdown_timeout = std::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, context.shutdown()).await {
        Ok(_) => info!("context shutdown successfully"),
        Err(_) => error!("context shutdown timed out"),
    }

    Ok(())
}
