pub(crate) mod hypixel;
pub(crate) mod mojang;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, Result, Service};

/// Issue a GET and return the status with the raw body.
///
/// Status handling is left to the caller because each service gives
/// different codes a different meaning.
pub(crate) async fn get_text(
    client: &reqwest::Client,
    service: Service,
    url: &str,
) -> Result<(StatusCode, String)> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::transport(service, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::transport(service, e))?;

    debug!(%service, status = status.as_u16(), bytes = body.len(), "received response");
    Ok((status, body))
}

/// Deserialize a JSON body, reporting `context` on failure.
pub(crate) fn decode<T: DeserializeOwned>(service: Service, body: &str, context: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ApiError::parse(service, format!("{context}: {e}")))
}

/// Strip dashes from a UUID; the stats service only accepts the compact form.
pub(crate) fn compact_uuid(uuid: &str) -> String {
    uuid.replace('-', "")
}

#[cfg(test)]
pub(crate) mod stub {
    //! Minimal HTTP/1.1 server answering canned responses by path prefix.

    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    pub(crate) struct Route {
        pub path: &'static str,
        pub status: u16,
        pub body: String,
        pub delay: Option<Duration>,
    }

    impl Route {
        pub(crate) fn new(path: &'static str, status: u16, body: impl Into<String>) -> Self {
            Self {
                path,
                status,
                body: body.into(),
                delay: None,
            }
        }

        pub(crate) fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    /// Client for talking to the stub; bypasses any system proxy.
    pub(crate) fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    /// Spawn the server and return its base URL. Unknown paths get a 500.
    pub(crate) async fn serve(routes: Vec<Route>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    loop {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => {
                                request.extend_from_slice(&buf[..n]);
                                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                    break;
                                }
                            }
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();

                    let route = routes.iter().find(|r| path.starts_with(r.path));
                    let (status, body, delay) = match route {
                        Some(r) => (r.status, r.body.clone(), r.delay),
                        None => (500, format!("no route for {path}"), None),
                    };
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }

                    let response = format!(
                        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}")
    }
}
