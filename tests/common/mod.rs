//! Shared utilities for gateway integration tests.

use axum::http::StatusCode;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use faculty_gateway::config::GatewayConfig;
use faculty_gateway::resolver::{Candidates, EndpointResolver, RuntimeMode};
use faculty_gateway::{GatewayServer, Shutdown};

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request line target (e.g. `"GET /users?x=1"`) and
/// returns the status and body to send back.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let target = read_request_target(&mut socket).await;
                        let (status, body) = f(target).await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("OK");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read request headers and return `"METHOD target"` from the request line.
async fn read_request_target(socket: &mut TcpStream) -> String {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") && buf.len() < 16 * 1024 {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let line = text.lines().next().unwrap_or_default();
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    format!("{} {}", method, target)
}

/// Address nothing is listening on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Start a gateway in front of `primary`/`secondary` and return its address.
pub async fn start_gateway(primary: SocketAddr, secondary: SocketAddr, shutdown: &Shutdown) -> SocketAddr {
    let candidates = Candidates::parse(
        &format!("http://{}", primary),
        &format!("http://{}", secondary),
    )
    .unwrap();
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    let resolver = EndpointResolver::builder(candidates)
        .mode(RuntimeMode::Development)
        .timeout(Duration::from_millis(500))
        .client(client)
        .build()
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = GatewayServer::new(GatewayConfig::default(), Arc::new(resolver), shutdown.subscribe());
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
