use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};

use crate::{
    api::digest::{self, Credentials},
    core::{inverter::InverterReading, scraper::Device},
    prelude::*,
};

const INVERTERS_PATH: &str = "api/v1/production/inverters";

/// Local Envoy gateway.
pub struct Api {
    url: Url,
    authentication: Authentication,
}

enum Authentication {
    /// Legacy firmware: plain HTTP with the installer Digest credentials.
    Digest(digest::Client),

    /// Newer firmware: HTTPS with an Enlighten-issued bearer token.
    Bearer { client: Client, token: String },
}

impl Api {
    #[instrument(skip_all, fields(host = host, username = %credentials.username))]
    pub fn digest(host: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder().user_agent("envoy-scrape").timeout(timeout).build()?;
        Ok(Self {
            url: Url::parse(&format!("http://{host}/{INVERTERS_PATH}"))
                .with_context(|| format!("invalid Envoy host `{host}`"))?,
            authentication: Authentication::Digest(digest::Client::new(client, credentials)),
        })
    }

    #[instrument(skip_all, fields(host = host, accept_invalid_certs = accept_invalid_certs))]
    pub fn bearer(
        host: &str,
        token: String,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        // The Envoy presents a self-signed certificate.
        let client = Client::builder()
            .user_agent("envoy-scrape")
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self {
            url: Url::parse(&format!("https://{host}/{INVERTERS_PATH}"))
                .with_context(|| format!("invalid Envoy host `{host}`"))?,
            authentication: Authentication::Bearer { client, token },
        })
    }

    #[instrument(skip_all, fields(url = %self.url))]
    pub async fn get_inverters(&self) -> Result<Vec<InverterReading>> {
        let (status, body) = match &self.authentication {
            Authentication::Digest(client) => {
                let response = client.get(self.url.clone()).await?;
                (response.status, response.body)
            }
            Authentication::Bearer { client, token } => {
                let response = client
                    .get(self.url.clone())
                    .header(ACCEPT, "application/json")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .send()
                    .await
                    .with_context(|| format!("failed to call `{}`", self.url))?;
                let status = response.status();
                (status, response.text().await.context("failed to read the response body")?)
            }
        };
        ensure!(status.is_success(), "`{}` responded with {status}", self.url);
        trace!(%body, "fetched");
        serde_json::from_str(&body)
            .with_context(|| format!("failed to deserialize the inverters: `{body}`"))
    }

    #[cfg(test)]
    fn with_url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }
}

#[async_trait]
impl Device for Api {
    async fn get_inverters(&self) -> Result<Vec<InverterReading>> {
        Self::get_inverters(self).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;

    // language=json
    const BODY: &str = r#"[
        {"serialNumber": "482207012345", "lastReportDate": 1670000000, "devType": 1, "lastReportWatts": 212, "maxReportWatts": 295}
    ]"#;

    #[test]
    fn digest_url_ok() -> Result {
        let credentials =
            Credentials { username: "installer".to_string(), password: "secret".to_string() };
        let api = Api::digest("envoy.local", credentials, Duration::from_secs(1))?;
        assert_eq!(api.url.as_str(), "http://envoy.local/api/v1/production/inverters");
        Ok(())
    }

    #[test]
    fn bearer_url_ok() -> Result {
        let api = Api::bearer("192.168.1.10", "token".to_string(), Duration::from_secs(1), true)?;
        assert_eq!(api.url.as_str(), "https://192.168.1.10/api/v1/production/inverters");
        Ok(())
    }

    #[tokio::test]
    async fn bearer_get_inverters_ok() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/production/inverters")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let url = Url::parse(&server.url())?.join(INVERTERS_PATH)?;
        let inverters =
            Api::bearer("localhost", "secret-token".to_string(), Duration::from_secs(5), true)?
                .with_url(url)
                .get_inverters()
                .await?;

        assert_eq!(inverters.len(), 1);
        assert_eq!(inverters[0].serial_number, "482207012345");
        assert_eq!(inverters[0].last_report_watts, 212);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn digest_get_inverters_ok() -> Result {
        let mut server = Server::new_async().await;
        let _challenge = server
            .mock("GET", "/api/v1/production/inverters")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .with_header(
                "www-authenticate",
                r#"Digest realm="enphaseenergy.com", qop="auth", nonce="1234abcd""#,
            )
            .create_async()
            .await;
        let _authorized = server
            .mock("GET", "/api/v1/production/inverters")
            .match_header("authorization", Matcher::Regex("^Digest ".to_string()))
            .with_status(200)
            .with_body(BODY)
            .create_async()
            .await;

        let credentials =
            Credentials { username: "installer".to_string(), password: "ffc6e2c2".to_string() };
        let url = Url::parse(&server.url())?.join(INVERTERS_PATH)?;
        let inverters = Api::digest("localhost", credentials, Duration::from_secs(5))?
            .with_url(url)
            .get_inverters()
            .await?;

        assert_eq!(inverters.len(), 1);
        assert_eq!(inverters[0].max_report_watts, 295);
        Ok(())
    }

    #[tokio::test]
    async fn get_inverters_rejects_error_status() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/production/inverters")
            .with_status(500)
            .with_body(BODY)
            .create_async()
            .await;

        let url = Url::parse(&server.url())?.join(INVERTERS_PATH)?;
        let result = Api::bearer("localhost", "token".to_string(), Duration::from_secs(5), true)?
            .with_url(url)
            .get_inverters()
            .await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn get_inverters_rejects_malformed_body() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/production/inverters")
            .with_status(200)
            .with_body("<html>nope</html>")
            .create_async()
            .await;

        let url = Url::parse(&server.url())?.join(INVERTERS_PATH)?;
        let error = Api::bearer("localhost", "token".to_string(), Duration::from_secs(5), true)?
            .with_url(url)
            .get_inverters()
            .await
            .unwrap_err();
        assert!(format!("{error:#}").contains("failed to deserialize the inverters"));
        Ok(())
    }
}
