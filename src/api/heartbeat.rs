use std::time::Duration;

use reqwest::{Client, Url};

use crate::prelude::*;

/// Liveness ping posted after every successful poll, if configured.
#[must_use]
pub struct Heartbeat(Option<(Client, Url)>);

impl Heartbeat {
    pub fn new(url: Option<Url>, timeout: Duration) -> Result<Self> {
        let Some(url) = url else {
            return Ok(Self::disabled());
        };
        let client = Client::builder().user_agent("envoy-scrape").timeout(timeout).build()?;
        Ok(Self(Some((client, url))))
    }

    pub const fn disabled() -> Self {
        Self(None)
    }

    /// Post the ping. Failures are only logged.
    pub async fn send(&self) {
        let Some((client, url)) = &self.0 else {
            return;
        };
        match client.post(url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "heartbeat sent");
            }
            Ok(response) => warn!(%url, status = %response.status(), "heartbeat rejected"),
            Err(error) => warn!(%url, "heartbeat failed: {error:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;

    #[tokio::test]
    async fn send_ok() -> Result {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/ping").with_status(200).expect(2).create_async().await;

        let url = Url::parse(&server.url())?.join("/ping")?;
        let heartbeat = Heartbeat::new(Some(url), Duration::from_secs(3))?;
        heartbeat.send().await;
        heartbeat.send().await;

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn rejected_ping_does_not_escape() -> Result {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/ping").with_status(500).expect(1).create_async().await;

        let url = Url::parse(&server.url())?.join("/ping")?;
        Heartbeat::new(Some(url), Duration::from_secs(3))?.send().await;

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_url_disables() -> Result {
        let heartbeat = Heartbeat::new(None, Duration::from_secs(3))?;
        assert!(heartbeat.0.is_none());
        heartbeat.send().await;
        Ok(())
    }
}
