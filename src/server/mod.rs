//! Static file server with host redirects and locale negotiation

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::i18n::Routing;
use crate::redirect::{find_redirect, RedirectRule};
use crate::Site;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    redirects: Vec<RedirectRule>,
    routing: Routing,
}

/// Build the application router for a site
pub fn router(site: &Site) -> Router {
    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        redirects: site.config.redirects.clone(),
        routing: site.routing(),
    });

    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    if !site.public_dir.exists() {
        tracing::warn!(
            "Public directory {:?} does not exist, run `generate` first",
            site.public_dir
        );
    }

    let app = router(site);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fallback handler: redirects first, then files from the public directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok());

    if let Some(rule) = find_redirect(&state.redirects, path, host) {
        tracing::debug!("Redirecting {} on {:?} to {}", path, host, rule.destination);
        return redirect(rule.status(), &rule.destination);
    }

    if path == "/" {
        let accept_language = request
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        let locale = state.routing.negotiate(accept_language);
        return redirect(StatusCode::TEMPORARY_REDIRECT, &format!("/{}/", locale));
    }

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            not_found(&state).await
        }
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve file: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn redirect(status: StatusCode, location: &str) -> Response {
    (status, [(header::LOCATION, location.to_string())]).into_response()
}

/// Serve the generated 404 page, or plain text when there is none
async fn not_found(state: &ServerState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(content) => (StatusCode::NOT_FOUND, Html(content)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}
