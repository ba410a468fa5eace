//! HTTP surface
//!
//! Serves `GET /{repository}` (path-style bucket addressing) with the
//! [`ListObjects`] handler. Each request runs on its own task; dropping the
//! connection drops the in-flight catalog call with it.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::list::ListObjects;
use crate::params::QueryParams;
use crate::response::XmlResponse;

/// Build the gateway router around a shared handler
pub fn router(handler: Arc<ListObjects>) -> Router {
    Router::new()
        .route("/{repository}", get(list_objects))
        .route("/{repository}/", get(list_objects))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

async fn list_objects(
    State(handler): State<Arc<ListObjects>>,
    Path(repository): Path<String>,
    RawQuery(query): RawQuery,
) -> XmlResponse {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let result = handler.handle(&repository, &params).await;
    XmlResponse::from_result(result, &repository)
}

/// Serve the gateway on `listener` until `shutdown` resolves
pub async fn serve<F>(
    listener: TcpListener,
    handler: Arc<ListObjects>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "lakegate listening");
    }
    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await
}
