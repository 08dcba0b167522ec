mod app;
mod config;
mod error;
mod routes;
mod views;

use crate::app::AppState;
use crate::config::ServerConfig;
use anyhow::Context;
use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("espn-league-server listening on {}", config.bind);

    let app = app::build_router(AppState::new(config));
    axum::serve(listener, app).await?;

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("espn-league-server {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "espn-league-server - ESPN fantasy basketball league data over REST

Usage:
  espn-league-server
  espn-league-server --help
  espn-league-server --version

Environment (a .env file is read first):
  API_KEY            Key clients must send in the x-api-key header (required)
  ESPN_S2, SWID      Default ESPN cookies for private leagues
  LEAGUE_API_BIND    Listen address (default 127.0.0.1:8000)
  ESPN_FANTASY_URL   Override the ESPN fantasy API base URL
  ESPN_NEWS_URL      Override the ESPN news API base URL
  RUST_LOG           Log filter (default info)"
}
