use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ClientError, ClientResult, EventsClient};
use crate::domain::*;

/// Talks to the webhook backend over plain HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpEventsClient {
    http_client: HttpClient,
    base_url: Url,
}

impl HttpEventsClient {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    /// With no timeout a hung request stalls its poll cycle until it resolves.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = HttpClient::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!("using events API at {}", base_url);
        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl EventsClient for HttpEventsClient {
    async fn list_events(&self) -> ClientResult<EventsPage> {
        let url = self.endpoint(&["events"])?;
        self.get::<EventsPage>(url).await
    }

    async fn get_event(&self, request_id: &str) -> ClientResult<WebhookEvent> {
        let url = self.endpoint(&["events", request_id])?;
        match self.get::<EventEnvelope>(url).await {
            Ok(envelope) => Ok(envelope.event),
            Err(ClientError::Status { status: 404, .. }) => {
                Err(ClientError::NotFound(request_id.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the base URL plus the
    /// request line the client sent.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}/api", addr), handle)
    }

    #[test]
    fn endpoint_appends_to_api_root() {
        let client = HttpEventsClient::new("http://localhost:5000/api", None).unwrap();
        assert_eq!(
            client.endpoint(&["events"]).unwrap().as_str(),
            "http://localhost:5000/api/events"
        );

        let client = HttpEventsClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(
            client.endpoint(&["events", "a/b"]).unwrap().as_str(),
            "http://localhost:5000/api/events/a%2Fb"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            HttpEventsClient::new("not a url", None),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpEventsClient::new("mailto:ops@example.com", None),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn lists_events() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"success":true,"count":1,"events":[{"action":"PUSH","author":"bob","to_branch":"main","from_branch":null,"timestamp":"2021-04-01T21:30:00Z","request_id":"r1"}]}"#,
        )
        .await;
        let client = HttpEventsClient::new(&base, None).unwrap();

        let page = client.list_events().await.unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.events[0].author, "bob");
        assert_eq!(page.events[0].action, EventAction::Push);
        assert_eq!(server.await.unwrap(), "GET /api/events HTTP/1.1");
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let (base, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"success":false,"error":"Failed to fetch events"}"#,
        )
        .await;
        let client = HttpEventsClient::new(&base, None).unwrap();

        let err = client.list_events().await.unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        assert!(err.is_connection_failure());
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (base, _server) = serve_once("200 OK", "<html>oops</html>").await;
        let client = HttpEventsClient::new(&base, None).unwrap();

        let err = client.list_events().await.unwrap_err();

        assert!(matches!(err, ClientError::Parse(_)));
        assert!(err.is_connection_failure());
    }

    #[tokio::test]
    async fn missing_event_is_not_found() {
        let (base, server) =
            serve_once("404 Not Found", r#"{"success":false,"error":"Event not found"}"#).await;
        let client = HttpEventsClient::new(&base, None).unwrap();

        let err = client.get_event("abc-123").await.unwrap_err();

        assert_eq!(err, ClientError::NotFound("abc-123".to_string()));
        assert!(!err.is_connection_failure());
        assert_eq!(server.await.unwrap(), "GET /api/events/abc-123 HTTP/1.1");
    }

    #[tokio::test]
    async fn fetches_single_event() {
        let (base, _server) = serve_once(
            "200 OK",
            r#"{"success":true,"event":{"action":"MERGE","author":"alice","from_branch":"dev","to_branch":"main","timestamp":"2021-04-01T21:30:00Z","request_id":"r1"}}"#,
        )
        .await;
        let client = HttpEventsClient::new(&base, None).unwrap();

        let event = client.get_event("r1").await.unwrap();

        assert_eq!(event.action, EventAction::Merge);
        assert_eq!(event.from_branch, "dev");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = HttpEventsClient::new(&format!("http://{}/api", addr), None).unwrap();

        let err = client.list_events().await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
    }
}
