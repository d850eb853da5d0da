use clap::Parser;
use plugstat::config::Config;
use plugstat::fetch::HttpStatsSource;
use plugstat::notify::TelegramNotifier;
use plugstat::pipeline::Pipeline;
use plugstat::report::Renderer;
use plugstat::store::{FileDocument, JsonFileStore};

/// Collects daily download stats for the plugin, updates README badges and sends a report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _args = Args::parse();
    plugstat::logging::init();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        Config::default()
    });

    let source = HttpStatsSource::new(
        config.plugin.stats_url.clone(),
        config.plugin.id.clone(),
        config.plugin.timeout(),
    );
    let store = JsonFileStore::new(&config.store.history_path, &config.store.summary_path);
    let document = config
        .document
        .enabled
        .then(|| FileDocument::new(&config.document.path));
    let notifier = TelegramNotifier::from_credentials(
        &config.telegram.api_base,
        config.telegram.bot_token.as_deref(),
        config.telegram.chat_id.as_deref(),
    );
    let renderer = Renderer::new(
        config.plugin.display_name.clone(),
        config.report.milestones.clone(),
    );

    let pipeline = Pipeline::new(source, store, document, notifier, renderer)
        .with_history_limit(config.store.history_limit);

    match pipeline.run().await {
        Ok(outcome) => {
            tracing::info!(
                net_new = outcome.changes.net_new_downloads,
                history = outcome.history_len,
                "stats collection finished"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            Err(e.into())
        }
    }
}
