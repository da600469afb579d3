use crate::api::routes;
use crate::config::SharedConfig;
use crate::route53::DynUpserter;
use std::future::Future;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: SharedConfig,
    pub upserter: DynUpserter,
}

/// Bind the API listener and return the server future.
///
/// # Errors
///
/// Returns an error if `api_bind_addr` can't be bound.
pub fn new(
    config: SharedConfig,
    upserter: DynUpserter,
) -> hyper::Result<impl Future<Output = hyper::Result<()>>> {
    let builder = axum::Server::try_bind(&config.api_bind_addr)?;
    Ok(builder.serve(routes::new(AppState { config, upserter }).into_make_service()))
}
