//! Support agent server binary

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use support_agent_config::{DeliveryProvider, ServerConfig, Settings};
use support_agent_rag::{load_once, spawn_refresh_task};
use support_agent_server::{build_app, build_state};
use support_agent_tools::{TelegramConfig, TelegramDelivery};

/// How often idle sessions are swept
const EVICTION_PERIOD: Duration = Duration::from_secs(60);

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.server);

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    let (state, source) = build_state(&settings)?;
    let state = state.with_metrics(metrics);

    if settings.delivery.provider == DeliveryProvider::Telegram {
        check_telegram(&settings).await;
    }

    // the server starts even if the first load fails; turns get the loading message
    if let Err(e) = load_once(&state.knowledge, source.as_ref()).await {
        tracing::warn!(error = %e, source = source.name(), "Initial knowledge load failed");
    }
    let refresh = (settings.knowledge.refresh_interval_secs > 0).then(|| {
        spawn_refresh_task(
            state.knowledge.clone(),
            source.clone(),
            Duration::from_secs(settings.knowledge.refresh_interval_secs),
        )
    });
    let eviction = state.sessions.spawn_eviction_task(
        Duration::from_secs(settings.agent.session_idle_ttl_secs),
        EVICTION_PERIOD,
    );

    let app = build_app(state, &settings.server);
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Support agent listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(refresh) = refresh {
        refresh.abort();
    }
    eviction.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log whether the bot token works; tickets are still attempted either way
async fn check_telegram(settings: &Settings) {
    let result = match TelegramDelivery::new(TelegramConfig::from(&settings.delivery)) {
        Ok(bot) => bot.test_connection().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(username) => tracing::info!(bot = %username, "Telegram bot reachable"),
        Err(e) => tracing::warn!(error = %e, "Telegram connection check failed"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
