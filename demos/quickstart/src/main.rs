use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use hyper::{body::Incoming, service::Service};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder,
};
use struct_bind::{config::BindConfig, service::EndpointService};
use tokio::net::TcpListener;
use tracing_log_error::log_error;
use tracing_subscriber::EnvFilter;

mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")))
        .init();

    if let Err(e) = _main().await {
        log_error!(*e, "The application is exiting due to an error");
    }
    Ok(())
}

async fn _main() -> anyhow::Result<()> {
    let config = BindConfig::load(Some(Path::new("bind.yml")))?;

    let list_homes = EndpointService::new(config.query_wrap().wrap(routes::list_homes))
        .body_size_limit(config.body_size_limit);
    let sell_home = EndpointService::new(config.body_wrap().wrap(routes::sell_home))
        .body_size_limit(config.body_size_limit);
    let health = EndpointService::new(config.query_wrap().wrap(routes::health));

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 8000)))
        .await
        .context("Failed to bind the server TCP listener")?;
    let address = listener
        .local_addr()
        .context("The server TCP listener doesn't have a local socket address")?;
    tracing::info!("Starting to listen for incoming requests at {}", address);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    log_error!(e, "Failed to accept a connection");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
        };

        let (list_homes, sell_home, health) = (list_homes.clone(), sell_home.clone(), health.clone());
        // A hand-written router: binding is all this demo is about.
        let router = hyper::service::service_fn(move |request: http::Request<Incoming>| {
            match (request.method(), request.uri().path()) {
                (&http::Method::POST, "/sell") => sell_home.call(request),
                (_, "/health") => health.call(request),
                _ => list_homes.call(request),
            }
        });
        tokio::spawn(async move {
            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), router)
                .await
            {
                log_error!(*e, level: tracing::Level::WARN, "Failed to serve a connection from {peer}");
            }
        });
    }
}
