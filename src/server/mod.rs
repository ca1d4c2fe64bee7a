//! HTTP server routing requests through the content pipeline
//!
//! Every request outside `/static` is mapped to a logical content path and
//! resolved through `ContentManager::get`. Static assets are served
//! verbatim from the site's static directory.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentError, ContentManager};
use crate::Site;

/// Server state
struct ServerState {
    site: Site,
    manager: ContentManager,
}

/// Start serving the site.
pub async fn start(site: &Site, manager: ContentManager, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        manager,
    });

    let app = Router::new()
        .nest_service("/static", ServeDir::new(&state.site.static_dir))
        .fallback(content_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolve a request to rendered content.
///
/// A `.html` suffix is stripped so `/about.html` and `/about` address the
/// same document. The site context is reloaded per request and passed as
/// the caller context layer.
async fn content_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let decoded = percent_decode_str(uri.path()).decode_utf8_lossy();
    let path = decoded.strip_suffix(".html").unwrap_or(&decoded);

    let ctx = state.site.site_context();
    match state.manager.get(path, ctx.as_ref()) {
        Ok(bytes) => Html(bytes).into_response(),
        Err(err @ ContentError::InvalidPath(_)) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err @ ContentError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Err(err) => {
            tracing::error!("rendering `{}` failed: {}", path, err);
            (StatusCode::INTERNAL_SERVER_ERROR, "render failed").into_response()
        }
    }
}
