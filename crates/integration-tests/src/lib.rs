//! Integration tests for techstore.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (stub HTTP server, temporary profiles)
//! cargo test -p techstore-integration-tests
//!
//! # Include the tests against the public demo APIs
//! cargo test -p techstore-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart surviving restarts of a file-backed profile
//! - `accounts` - Registration, login and session over a profile
//! - `catalog` - Product search against a stub and the live product API
//! - `admin_api` - Admin client against a stub and the live admin API

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use techstore_storefront::config::StorefrontConfig;
use techstore_storefront::state::AppState;
use techstore_storefront::storage::StorageError;

// =============================================================================
// Profiles
// =============================================================================

/// Open application state over a profile directory, with the catalog
/// pointed at `catalog_url` when given.
///
/// # Errors
///
/// Returns an error if the profile directory cannot be created.
pub fn open_profile(dir: &Path, catalog_url: Option<&Url>) -> Result<AppState, StorageError> {
    let mut vars = HashMap::new();
    vars.insert("TECHSTORE_DATA_DIR", dir.display().to_string());
    if let Some(url) = catalog_url {
        vars.insert("TECHSTORE_CATALOG_URL", url.to_string());
    }

    let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    AppState::open(config)
}

// =============================================================================
// Stub HTTP server
// =============================================================================

/// A canned response for one method and path.
#[derive(Debug, Clone)]
pub struct StubRoute {
    method: String,
    path: String,
    status: u16,
    body: String,
}

impl StubRoute {
    #[must_use]
    pub fn new(method: &str, path: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            status,
            body: body.into(),
        }
    }
}

/// A request received by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    /// Path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }
}

/// Minimal HTTP/1.1 server answering with canned responses.
///
/// Unknown routes get a 404. Each connection serves one request.
#[derive(Debug, Clone)]
pub struct StubServer {
    base_url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Start serving `routes` on a random local port.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(routes: Vec<StubRoute>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = serve_connection(socket, &routes, &recorded).await;
                });
            }
        });

        Ok(Self { base_url, requests })
    }

    /// Base URL of the stub (`http://127.0.0.1:<port>/`).
    #[must_use]
    pub fn url(&self) -> Url {
        self.base_url.clone()
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

async fn serve_connection(
    mut socket: TcpStream,
    routes: &[StubRoute],
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let request = read_request(&mut socket).await?;

    let route = routes
        .iter()
        .find(|r| r.method == request.method && r.path == request.path());
    let (status, body) = route.map_or((404, "{}"), |r| (r.status, r.body.as_str()));

    if let Ok(mut requests) = recorded.lock() {
        requests.push(request);
    }

    let response = format!(
        "HTTP/1.1 {status} Stub\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buffer.extend_from_slice(chunk.get(..n).unwrap_or_default());
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(buffer.get(..header_end).unwrap_or_default()).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer.get(header_end..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(chunk.get(..n).unwrap_or_default());
    }

    Ok(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
