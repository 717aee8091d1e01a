use std::net::SocketAddr;
use axum::body::Body;
use axum::Server;
use lambda_http::{run, Error};
use tracing::{error, info};
use book_catalog::catalog::controller::catalog_router;
use book_catalog::catalog::factory::create_catalog_service;
use book_catalog::core::controller::AppState;
use book_catalog::core::domain::Configuration;
use book_catalog::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html
// Without AWS_LAMBDA_RUNTIME_API the catalog listens on BIND_ADDR.

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env().map_err(|err| {
        error!("catalog cannot start: {}", err);
        err
    })?;
    let catalog_service = create_catalog_service(&config).await.map_err(|err| {
        error!(store = %config.store, "failed to build catalog service: {}", err);
        err
    })?;
    let state = AppState::new(catalog_service);

    if config.lambda_runtime {
        info!(store = %config.store, "serving catalog through lambda runtime");
        run(catalog_router::<lambda_http::Body>(state)).await
    } else {
        let addr: SocketAddr = config.bind_addr.parse()?;
        info!(%addr, store = %config.store, "serving catalog");
        Server::bind(&addr)
            .serve(catalog_router::<Body>(state).into_make_service())
            .await?;
        Ok(())
    }
}
