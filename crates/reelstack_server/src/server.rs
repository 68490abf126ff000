//! Binding and serving the API.

use crate::api::{ApiState, create_router};
use reelstack_error::{HttpError, ReelstackResult};
use reelstack_interface::FeedStore;
use std::net::SocketAddr;
use tracing::info;

/// Bind the address and serve the API until the process is stopped.
pub async fn serve<S>(addr: SocketAddr, state: ApiState<S>) -> ReelstackResult<()>
where
    S: FeedStore + 'static,
{
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HttpError::new(format!("failed to bind {addr}: {e}")))?;
    info!(%addr, "serving reelstack API");

    axum::serve(listener, router)
        .await
        .map_err(|e| HttpError::new(format!("server error: {e}")))?;
    Ok(())
}
