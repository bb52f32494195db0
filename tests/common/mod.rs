//! Shared utilities for integration testing: a scripted mock wallet server.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One scripted HTTP response from the mock wallet.
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    /// A JSON-RPC success body wrapping `result`.
    pub fn result(result: Value) -> Self {
        Self::json(json!({ "jsonrpc": "2.0", "result": result }))
    }

    /// A JSON-RPC application-error body (no `result` field).
    pub fn error(error: Value) -> Self {
        Self::json(json!({ "jsonrpc": "2.0", "error": error }))
    }

    /// An arbitrary JSON body.
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    /// A non-JSON body, for malformed-response tests.
    #[allow(dead_code)]
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html",
            body: body.to_string(),
        }
    }
}

/// Handle to a running mock wallet server.
pub struct MockWallet {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockWallet {
    /// Request bodies received so far, in arrival order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock wallet on an ephemeral port. The handler receives each
/// parsed request body and produces the response to send.
pub async fn start_mock_wallet<F>(handler: F) -> MockWallet
where
    F: Fn(&Value) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));

    let handler = Arc::new(handler);
    let log = Arc::clone(&requests);
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = Arc::clone(&handler);
                    let log = Arc::clone(&log);
                    tokio::spawn(async move {
                        if let Some(body) = read_request_body(&mut socket).await {
                            log.lock().unwrap().push(body.clone());
                            let response = handler(&body);
                            let _ = write_response(&mut socket, &response).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockWallet {
        url: format!("http://{}/wallet", addr),
        requests,
    }
}

/// Read one HTTP request off the socket and parse its JSON body.
async fn read_request_body(socket: &mut TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    serde_json::from_slice(&buf[body_start..body_start + content_length]).ok()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn write_response(
    socket: &mut TcpStream,
    response: &MockResponse,
) -> std::io::Result<()> {
    let status_text = match response.status {
        200 => "200 OK",
        500 => "500 Internal Server Error",
        _ => "200 OK",
    };
    let raw = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        response.content_type,
        response.body.len(),
        response.body
    );
    socket.write_all(raw.as_bytes()).await
}

/// The `method` field of a request body.
#[allow(dead_code)]
pub fn method_of(request: &Value) -> &str {
    request.get("method").and_then(Value::as_str).unwrap_or("")
}
