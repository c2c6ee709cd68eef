use axum::routing::get;
use axum::{Router, middleware};
use log::info;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use hostelhub_messaging::integration::Config;
use hostelhub_messaging::state::AppState;
use hostelhub_messaging::{auth, conversation, event, message};

#[tokio::main]
async fn main() {
    let config = Config::default();
    let state = AppState::init(&config).await;

    let api = Router::new()
        .merge(conversation::api(state.clone()))
        .merge(message::api(state.clone()))
        .merge(event::api(state.clone()))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::authenticate,
        ));

    let cors = CorsLayer::new()
        .allow_origin(config.env.allow_origin())
        .allow_methods(config.env.allow_methods())
        .allow_headers(config.env.allow_headers());

    let router = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let addr = config.env.addr();
    info!("Listening on {addr}");

    match config.env.ssl_config() {
        Some(ssl_config) => axum_server::bind_openssl(addr, ssl_config)
            .serve(router.into_make_service())
            .await
            .expect("Failed to start server"),
        None => axum_server::bind(addr)
            .serve(router.into_make_service())
            .await
            .expect("Failed to start server"),
    }
}
