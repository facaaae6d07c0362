mod action;
mod app;
mod component;
mod components;
mod focus;
mod form;
mod page;
mod search;
mod theme;
mod validator;
mod widgets;

use anyhow::Context;
use swapi_proto::config::Config;
use swapi_proto::SwapiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = swapi_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let log_path = data_dir.join("swsearch.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("swsearch log: {}", log_path.display());

    tracing::info!("swsearch starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load();
    tracing::info!("api base url: {}", config.api.base_url);

    let client = SwapiClient::new(&config.api).context("building HTTP client")?;

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(&config, client);
    app.run().await?;

    tracing::info!("swsearch exiting");
    Ok(())
}
