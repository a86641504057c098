use std::sync::Arc;

use clap::Parser;
use ferry_app::cli::Cli;
use ferry_app::{commands, logging, profile};
use ferry_core::TracingLogger;
use ferry_translator::{ChromiumFactory, TranslationService, TranslatorContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let profile::LoadedConfig { config, source } = profile::load_config(cli.config.as_deref())?;
    logging::init(config.json_logs);
    match source {
        Some(file) => tracing::info!("Loaded config from {}", file.display()),
        None => tracing::debug!("Using default config"),
    }

    let browsers = Arc::new(ChromiumFactory::new(config.browser.clone()));
    let context = TranslatorContext::builder(browsers)
        .config(config)
        .logger(Arc::new(TracingLogger))
        .build()
        .await?;
    let service = TranslationService::new(Arc::new(context));

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::execute(cli.command, cli.json, &service, &mut stdout).await {
        tracing::error!("{e:#}");
        return Err(e);
    }

    Ok(())
}
