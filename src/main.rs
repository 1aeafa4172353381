#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod augment;
mod config;
mod context;
mod day;
mod error;
mod favorites;
mod fetch;
mod image_cache;
mod page;
mod parse;
mod quota;
mod schema;
mod settings;
mod state;
mod store;

use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    http::Method,
    routing::{get, on, MethodFilter},
    Extension, Router,
};
use juniper_axum::{graphiql, graphql, playground};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

use crate::{
    config::Config,
    schema::{Schema, Shared},
    state::State,
    store::Store,
};

pub use error::Result;

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env();
    let store = match &config.store {
        Some(p) => Store::local(p).await?,
        None => {
            log::warn!("env var STORE not set, using ad-hoc memory store.");
            Store::ad_hoc()
        }
    };
    log::debug!("{store:?}");
    let shared = Shared(Arc::new(State::new(&config, store).await));
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;

    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    let app = Router::new()
        .route(
            "/graphql",
            on(
                MethodFilter::GET.or(MethodFilter::POST),
                graphql::<Arc<Schema>>,
            ),
        )
        .route("/graphiql", get(graphiql("/graphql", None)))
        .route("/playground", get(playground("/graphql", None)))
        .layer(cors_layer)
        .layer(Extension(Arc::new(schema::schema())))
        .layer(Extension(shared))
        .layer(compression_layer);

    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to listen on {addr}: {e}"));
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
