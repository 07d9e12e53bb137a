use std::sync::Arc;

use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;

use game_core::WordSelector;
use game_server::chat::{self, ChatOutbox};
use game_server::config::Config;
use game_server::create_routes;
use game_server::engine::Engine;
use game_server::overlay::{OverlayBroadcaster, OverlaySink};
use game_server::words::{DatamuseOracle, DenyList, DictionaryApi, RandomWordApi};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Starting word game server...");

    let config = Config::new();
    let broadcaster = Arc::new(OverlayBroadcaster::new(64));

    let http = reqwest::Client::new();
    let selector = WordSelector::new(
        Arc::new(RandomWordApi::new(http.clone())),
        Arc::new(DatamuseOracle::new(http.clone())),
        Arc::new(DenyList),
    );
    let definitions = Arc::new(DictionaryApi::new(http));

    // The Twitch reply channel is created up front so the engine can hold
    // the sender while the connector owns the receiver.
    let twitch_config = config.twitch();
    let (say_tx, say_rx) = mpsc::unbounded_channel();
    let outbox = ChatOutbox::new(twitch_config.as_ref().map(|_| say_tx));

    let engine = Engine::spawn(
        config.timing(),
        config.owner_name.clone(),
        selector,
        definitions,
        broadcaster.clone() as Arc<dyn OverlaySink>,
        Arc::new(outbox),
    );

    match twitch_config {
        Some(twitch) => {
            info!(channel = %twitch.channel, "starting twitch connector");
            chat::twitch::spawn(twitch, engine.clone(), say_rx);
        }
        None => info!("twitch credentials not configured, twitch chat disabled"),
    }

    match &config.kick_chat_ws {
        Some(url) => {
            info!(url, "starting kick connector");
            chat::kick::spawn(url.clone(), engine.clone());
        }
        None => info!("KICK_CHAT_WS not configured, kick chat disabled"),
    }

    let routes = create_routes(broadcaster, engine, config.public_dir.clone());

    let addr = (
        config
            .host
            .parse::<std::net::IpAddr>()
            .expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!("Server started on {}. Press Ctrl+C to stop.", addr);
    server.await;
    info!("Server shutdown complete.");
}
