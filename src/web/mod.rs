//! Proxy server and embedded page.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page MVP prompt generator at `/`
//! - The proxy endpoints `POST /generate`, `POST /submit-feedback`,
//!   `GET /stats` and `GET /health`
//!
//! Launched via `mvp-prompt serve` (default: `http://127.0.0.1:3000`).

pub mod api;
pub mod frontend;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::analytics::logger::{self, RequestLogEntry};
use crate::config::AppConfig;
use crate::error::ErrorKind;
use crate::gateway::{Backend, HttpBackend};
use api::ApiReply;

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Everything a request handler needs. Immutable and shared across the
/// per-request threads.
pub struct ProxyApp {
    backend: Arc<dyn Backend>,
    index_html: String,
    log_requests: bool,
}

/// A routed response before it is turned into a `tiny_http` response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Html(String),
    Json(ApiReply),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Html(_) => 200,
            Self::Json(reply) => reply.status,
        }
    }
}

impl ProxyApp {
    pub fn new(backend: Arc<dyn Backend>, public_backend_url: &str, log_requests: bool) -> Self {
        Self {
            backend,
            index_html: frontend::render_index(public_backend_url),
            log_requests,
        }
    }

    /// Build the app from resolved configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(HttpBackend::from_config(&config.backend)),
            &config.backend.public_url,
            config.logging.enabled,
        )
    }

    /// Route a request to its handler.
    pub fn dispatch(&self, method: &Method, url: &str, body: Option<&str>) -> Reply {
        let path = url.split('?').next().unwrap_or(url);
        let body = body.unwrap_or_default();

        match (method, path) {
            (&Method::Get, "/") | (&Method::Get, "/index.html") => {
                Reply::Html(self.index_html.clone())
            }
            (&Method::Post, "/generate") => {
                Reply::Json(api::generate_prompt(self.backend.as_ref(), body))
            }
            (&Method::Post, "/submit-feedback") => {
                Reply::Json(api::submit_feedback(self.backend.as_ref(), body))
            }
            (&Method::Get, "/stats") => Reply::Json(api::stats(self.backend.as_ref())),
            (&Method::Get, "/health") => Reply::Json(api::health()),
            _ => Reply::Json(api::not_found()),
        }
    }

    /// Handle one request end to end: read, dispatch, respond, log.
    fn handle(&self, mut request: Request) {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Post | Method::Put | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = self.dispatch(&method, &url, body.as_deref());
        let status = reply.status();
        let error = match &reply {
            Reply::Json(api) => api.error.clone(),
            Reply::Html(_) => None,
        };

        let _ = request.respond(into_response(reply));

        let path = url.split('?').next().unwrap_or(&url);
        if let Some(err) = &error
            && matches!(err.kind(), ErrorKind::Backend | ErrorKind::Transport)
        {
            eprintln!(
                "{} {} {} failed ({}): {}",
                "error:".red().bold(),
                method,
                path,
                err.kind(),
                err
            );
        }

        println!(
            "{} {} {} {}",
            method,
            path,
            colorize_status(status),
            chrono::Local::now().format("%H:%M:%S")
        );

        if self.log_requests {
            let latency_ms = started.elapsed().as_millis() as u64;
            logger::log_request(&RequestLogEntry::new(
                &method.to_string(),
                path,
                status,
                latency_ms,
                error.as_ref(),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry points
// ---------------------------------------------------------------------------

/// Start the proxy server from configuration. Blocks the current thread.
pub fn serve(config: &AppConfig) -> Result<()> {
    let addr = &config.server.addr;
    let server = bind(addr)?;

    println!("mvp-prompt running at http://{addr}");
    println!("  backend (proxy):  {}", config.backend.url);
    println!("  backend (stats):  {}", config.backend.public_url);
    println!("Press Ctrl+C to stop.\n");

    if config.server.open_browser {
        let _ = crate::utils::process::open_browser(&format!("http://{addr}"));
    }

    run(server, Arc::new(ProxyApp::from_config(config)));
    Ok(())
}

/// Bind the listening socket.
pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// Serve requests until the listener is closed.
///
/// Each request runs on its own thread so a slow generate call never holds
/// up the page or other callers.
pub fn run(server: Server, app: Arc<ProxyApp>) {
    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        std::thread::spawn(move || app.handle(request));
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn into_response(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    match reply {
        Reply::Html(html) => Response::from_data(html.into_bytes())
            .with_header(content_type_html())
            .with_status_code(StatusCode(200)),
        Reply::Json(api) => Response::from_data(api.body.to_string().into_bytes())
            .with_header(content_type_json())
            .with_status_code(StatusCode(api.status)),
    }
}

/// JSON content type header.
fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}

fn colorize_status(status: u16) -> colored::ColoredString {
    let text = status.to_string();
    match status {
        200..=299 => text.green(),
        400..=499 => text.yellow(),
        _ => text.red(),
    }
}
