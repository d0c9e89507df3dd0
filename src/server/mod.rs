//! Render endpoint
//!
//! A small blocking HTTP server exposing `POST /api/render`: the request body
//! is deck JSON, the response is the exported HTML document. Requests are
//! handled one at a time.

use crate::config::ServerSettings;
use crate::error::{Error, Result};
use crate::export::{export_deck, AssetSource};
use crate::projection::json::parse_deck;
use log::{debug, info, warn};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server};

/// Path of the render endpoint.
pub const RENDER_PATH: &str = "/api/render";

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// A response before it is written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl RenderResponse {
    fn new(status: u16, content_type: Option<&str>, body: String) -> Self {
        let mut headers = vec![("Access-Control-Allow-Origin", "*".to_string())];
        if let Some(content_type) = content_type {
            headers.push(("Content-Type", content_type.to_string()));
        }
        Self {
            status,
            headers,
            body,
        }
    }

    fn html(body: String) -> Self {
        Self::new(200, Some(HTML_CONTENT_TYPE), body).with_cors_details()
    }

    fn preflight() -> Self {
        Self::new(200, None, String::new()).with_cors_details()
    }

    fn error(status: u16, message: impl std::fmt::Display) -> Self {
        Self::new(status, Some(TEXT_CONTENT_TYPE), format!("Error: {}", message))
    }

    fn with_cors_details(mut self) -> Self {
        self.headers
            .push(("Access-Control-Allow-Headers", "Content-Type".to_string()));
        self.headers
            .push(("Access-Control-Allow-Methods", ALLOWED_METHODS.to_string()));
        self
    }

    fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn into_http(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body.into_bytes()).with_status_code(self.status);
        for (name, value) in &self.headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => warn!("Skipping invalid response header {}", name),
            }
        }
        response
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Handling
// ─────────────────────────────────────────────────────────────────────────────

/// Map one request to a response.
///
/// Status codes: `400` malformed JSON, `422` a deck with no usable slides or
/// too many, `404` unknown path, `405` other methods, `500` missing assets.
pub fn handle(method: &Method, url: &str, body: &[u8], source: &dyn AssetSource) -> RenderResponse {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path != RENDER_PATH {
        return RenderResponse::error(404, format!("no route for {}", path));
    }

    match method {
        Method::Options => RenderResponse::preflight(),
        Method::Post => render(body, source),
        other => RenderResponse::error(405, format!("method {} not allowed", other))
            .with_header("Allow", ALLOWED_METHODS),
    }
}

fn render(body: &[u8], source: &dyn AssetSource) -> RenderResponse {
    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(_) => return RenderResponse::error(400, "request body is not UTF-8"),
    };

    let result = parse_deck(text).and_then(|deck| export_deck(&deck, source));
    match result {
        Ok(html) => RenderResponse::html(html),
        Err(e) => {
            let status = status_for(&e);
            debug!("Render request failed with {}: {}", status, e);
            RenderResponse::error(status, e)
        }
    }
}

fn status_for(error: &Error) -> u16 {
    match error {
        Error::Parse(_) => 400,
        Error::Shape(_) | Error::InvalidDeckShape { .. } => 422,
        _ => 500,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Loop
// ─────────────────────────────────────────────────────────────────────────────

/// The render endpoint bound to a socket.
pub struct RenderServer {
    server: Server,
    source: Arc<dyn AssetSource>,
    max_body_bytes: usize,
}

impl RenderServer {
    /// Bind to the configured address.
    pub fn bind(settings: &ServerSettings, source: Arc<dyn AssetSource>) -> Result<Self> {
        let address = settings.address();
        let server = Server::http(&address)
            .map_err(|e| Error::Server(format!("could not listen on {}: {}", address, e)))?;

        Ok(Self {
            server,
            source,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    /// The bound address; useful when binding to port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener fails.
    pub fn run(self) -> Result<()> {
        info!(
            "Render server listening on http://{}{} (assets from {})",
            self.local_addr()
                .map_or_else(|| "?".to_string(), |addr| addr.to_string()),
            RENDER_PATH,
            self.source.describe()
        );
        loop {
            self.serve_one()?;
        }
    }

    /// Block until one request arrives and answer it.
    pub fn serve_one(&self) -> Result<()> {
        let mut request = self.server.recv()?;
        let response = self.respond_to(&mut request);

        info!(
            "{} {} -> {}",
            request.method(),
            request.url(),
            response.status
        );
        if let Err(e) = request.respond(response.into_http()) {
            warn!("Failed to send response: {}", e);
        }
        Ok(())
    }

    fn respond_to(&self, request: &mut Request) -> RenderResponse {
        if request.body_length().is_some_and(|len| len > self.max_body_bytes) {
            return self.too_large();
        }

        // Read one byte past the limit to detect oversized chunked bodies
        let mut body = Vec::new();
        let limit = self.max_body_bytes as u64 + 1;
        if let Err(e) = request.as_reader().take(limit).read_to_end(&mut body) {
            return RenderResponse::error(400, format!("could not read request body: {}", e));
        }
        if body.len() > self.max_body_bytes {
            return self.too_large();
        }

        let method = request.method().clone();
        handle(&method, request.url(), &body, self.source.as_ref())
    }

    fn too_large(&self) -> RenderResponse {
        RenderResponse::error(
            413,
            format!("request body exceeds {} bytes", self.max_body_bytes),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::assets::StaticAssets;
    use crate::export::html::RENDER_CALL;

    fn assets() -> StaticAssets {
        StaticAssets::new("`.slide{}`", "`function renderDeck(d, m) {}`")
    }

    #[test]
    fn test_post_renders_document() {
        let body = br#"{"slides": [{"title": "Hi"}], "autoplay": true, "loop": false}"#;
        let response = handle(&Method::Post, RENDER_PATH, body, &assets());

        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some(HTML_CONTENT_TYPE));
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert!(response.body.contains("\"title\": \"Hi\""));
        assert_eq!(response.body.matches(RENDER_CALL).count(), 1);
    }

    #[test]
    fn test_options_preflight() {
        let response = handle(&Method::Options, RENDER_PATH, b"", &assets());
        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type")
        );
        assert_eq!(
            response.header("Access-Control-Allow-Methods"),
            Some("POST, OPTIONS")
        );
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let response = handle(&Method::Post, RENDER_PATH, b"{not json", &assets());
        assert_eq!(response.status, 400);
        assert_eq!(response.body, "Error: Your code is not formatted correctly.");
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[test]
    fn test_shape_errors_are_unprocessable() {
        let response = handle(&Method::Post, RENDER_PATH, br#"{"autoplay": true}"#, &assets());
        assert_eq!(response.status, 422);
        assert_eq!(response.body, "Error: Missing or invalid 'slides' array.");

        let response = handle(&Method::Post, RENDER_PATH, br#"{"slides": []}"#, &assets());
        assert_eq!(response.status, 422);
    }

    #[test]
    fn test_missing_assets_is_server_error() {
        let source = StaticAssets {
            style: None,
            script: None,
        };
        let response = handle(&Method::Post, RENDER_PATH, br#"{"slides": [{}]}"#, &source);
        assert_eq!(response.status, 500);
        assert!(response.body.starts_with("Error: "));
    }

    #[test]
    fn test_unknown_path_and_method() {
        let response = handle(&Method::Post, "/api/other", b"{}", &assets());
        assert_eq!(response.status, 404);

        let response = handle(&Method::Get, RENDER_PATH, b"", &assets());
        assert_eq!(response.status, 405);
        assert_eq!(response.header("Allow"), Some("POST, OPTIONS"));
    }

    #[test]
    fn test_query_string_is_ignored() {
        let response = handle(
            &Method::Post,
            "/api/render?download=1",
            br#"{"slides": [{}]}"#,
            &assets(),
        );
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_non_utf8_body() {
        let response = handle(&Method::Post, RENDER_PATH, &[0xff, 0xfe], &assets());
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_server_answers_over_socket() {
        let settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_bytes: 1024,
        };
        let server = RenderServer::bind(&settings, Arc::new(assets())).unwrap();
        let addr = server.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            server.serve_one().unwrap();
            server.serve_one().unwrap();
        });

        let client = reqwest::blocking::Client::new();
        let url = format!("http://{}{}", addr, RENDER_PATH);

        let response = client
            .post(&url)
            .body(r#"{"slides": [{"title": "Socket"}]}"#)
            .send()
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert!(response.text().unwrap().contains("Socket"));

        let oversized = format!(r#"{{"slides": [{{"title": "{}"}}]}}"#, "x".repeat(2048));
        let response = client.post(&url).body(oversized).send().unwrap();
        assert_eq!(response.status().as_u16(), 413);

        handle.join().unwrap();
    }
}
