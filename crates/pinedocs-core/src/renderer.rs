//! Page rendering collaborator.
//!
//! The pipeline never talks to the network directly; it goes through the
//! [`Renderer`] trait, which delivers rendered HTML for a URL. The default
//! implementation is a plain HTTP client, which is sufficient for the target
//! site's server-rendered pages. Tests substitute in-memory renderers.

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Delivers rendered HTML for a URL.
///
/// Fails with a fetch-category error on network, timeout, or HTTP-status
/// problems. Implementations must be safe to call concurrently.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Fetch and render the page at `url`, returning the full HTML document.
    async fn render(&self, url: &str) -> Result<String>;
}

/// HTTP-backed renderer for server-rendered documentation pages.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Creates a renderer with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pinedocs/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        info!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

/// Render `url` with bounded retries and exponential backoff.
///
/// Recoverable failures (timeouts, connection errors, 429/5xx statuses) are
/// retried up to `retries` additional attempts, doubling the delay after each
/// one starting from `base_delay`. Permanent failures return immediately.
pub async fn render_with_retry(
    renderer: &dyn Renderer,
    url: &str,
    retries: u32,
    base_delay: Duration,
) -> Result<String> {
    let mut attempts = 0;
    let mut delay = base_delay;

    loop {
        match renderer.render(url).await {
            Ok(html) => return Ok(html),
            Err(e) if e.is_recoverable() && attempts < retries => {
                attempts += 1;
                warn!(
                    "Fetch attempt {attempts}/{retries} failed for {url}: {e}; \
                     retrying in {}ms",
                    delay.as_millis()
                );
                sleep(delay).await;
                delay *= 2;
            },
            Err(e) => {
                debug!("Giving up on {url} after {attempts} retries: {e}");
                return Err(e);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Renderer that fails a fixed number of times before succeeding.
    struct FlakyRenderer {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Renderer for FlakyRenderer {
        async fn render(&self, url: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(Error::Fetch {
                    url: url.to_string(),
                    status: 503,
                })
            } else {
                Ok("<html><body>ok</body></html>".to_string())
            }
        }
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let renderer = FlakyRenderer {
            failures: 2,
            calls: AtomicU32::new(0),
        };

        let html = render_with_retry(
            &renderer,
            "https://example.com/docs",
            3,
            Duration::from_millis(1),
        )
        .await
        .expect("should succeed after retries");

        assert!(html.contains("ok"));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_error() {
        let renderer = FlakyRenderer {
            failures: 10,
            calls: AtomicU32::new(0),
        };

        let result = render_with_retry(
            &renderer,
            "https://example.com/docs",
            2,
            Duration::from_millis(1),
        )
        .await;

        assert!(matches!(result, Err(Error::Fetch { status: 503, .. })));
        // Initial attempt plus two retries.
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn http_renderer_returns_body_on_success() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/page/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>page</body></html>"),
            )
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new(Duration::from_secs(5)).expect("client");
        let html = renderer
            .render(&format!("{}/docs/page/", server.uri()))
            .await
            .expect("render");

        assert!(html.contains("page"));
    }

    #[tokio::test]
    async fn http_renderer_maps_error_statuses() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new(Duration::from_secs(5)).expect("client");
        let result = renderer.render(&server.uri()).await;

        match result {
            Err(e @ Error::Fetch { status: 503, .. }) => assert!(e.is_recoverable()),
            other => panic!("expected a 503 fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        struct NotFoundRenderer;

        #[async_trait]
        impl Renderer for NotFoundRenderer {
            async fn render(&self, url: &str) -> Result<String> {
                Err(Error::Fetch {
                    url: url.to_string(),
                    status: 404,
                })
            }
        }

        let result = render_with_retry(
            &NotFoundRenderer,
            "https://example.com/missing",
            3,
            Duration::from_millis(1),
        )
        .await;

        assert!(matches!(result, Err(Error::Fetch { status: 404, .. })));
    }
}
