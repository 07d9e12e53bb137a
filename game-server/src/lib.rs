use std::sync::Arc;

use warp::Filter;

use crate::engine::EngineHandle;
use crate::overlay::OverlayBroadcaster;

pub mod chat;
pub mod config;
pub mod engine;
pub mod overlay;
pub mod words;

pub fn create_routes(
    broadcaster: Arc<OverlayBroadcaster>,
    engine: EngineHandle,
    public_dir: String,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let broadcaster_filter = warp::any().map({
        let broadcaster = broadcaster.clone();
        move || broadcaster.clone()
    });

    let engine_filter = warp::any().map({
        let engine = engine.clone();
        move || engine.clone()
    });

    // Overlay websocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(broadcaster_filter)
        .and(engine_filter)
        .map(|ws: warp::ws::Ws, broadcaster, engine| {
            ws.on_upgrade(move |socket| overlay::handle_overlay_socket(socket, broadcaster, engine))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Static overlay assets
    let assets = warp::fs::dir(public_dir);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(assets)
        .with(cors)
        .with(warp::log("game_server"))
}
