use std::time::Duration;

use async_trait::async_trait;
use http::{StatusCode, header::CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::{
    core::{
        inverter::{InverterReading, Submission},
        scraper::Collector,
    },
    prelude::*,
};

const AUTH_HEADER: &str = "x-flameorg-auth";

/// Remote receiver collecting the inverter updates.
pub struct Api {
    client: Client,
    url: Url,
    secret: String,
}

impl Api {
    pub fn new(url: Url, secret: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().user_agent("envoy-scrape").timeout(timeout).build()?;
        Ok(Self { client, url, secret })
    }

    /// Post the updated inverters, logging any failure.
    pub async fn send(&self, envoy_serial: &str, inverters: &[InverterReading]) {
        if let Err(error) = self.send_fallible(envoy_serial, inverters).await {
            warn!("failed to send the inverter update: {error:#}");
        }
    }

    #[instrument(skip_all, fields(url = %self.url, n_inverters = inverters.len()))]
    async fn send_fallible(&self, envoy_serial: &str, inverters: &[InverterReading]) -> Result {
        let body = serde_json::to_vec(&Submission { envoy_serial, inverters })?;
        debug!("sending…");
        let status = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTH_HEADER, &self.secret)
            .body(body)
            .send()
            .await
            .with_context(|| format!("failed to call `{}`", self.url))?
            .status();
        ensure!(status == StatusCode::OK, "receiver responded with {status}");
        Ok(())
    }
}

#[async_trait]
impl Collector for Api {
    async fn send(&self, envoy_serial: &str, inverters: &[InverterReading]) {
        Self::send(self, envoy_serial, inverters).await;
    }
}
