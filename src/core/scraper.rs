use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use itertools::Itertools;
use tokio::time::sleep;

use crate::{
    api::heartbeat::Heartbeat,
    core::{cache::ChangeCache, inverter::InverterReading},
    prelude::*,
};

/// Source of the current inverter readings.
#[async_trait]
pub trait Device: Sync {
    async fn get_inverters(&self) -> Result<Vec<InverterReading>>;
}

/// Destination of the changed readings. Failures are the implementor's business.
#[async_trait]
pub trait Collector: Sync {
    async fn send(&self, envoy_serial: &str, inverters: &[InverterReading]);
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PollSummary {
    pub n_fetched: usize,
    pub n_changed: usize,
    pub n_forwarded: usize,
}

/// Polls the device and forwards the readings which changed since the previous poll.
#[derive(Builder)]
pub struct Scraper<D, C> {
    device: D,
    collector: C,

    #[builder(into)]
    envoy_serial: String,

    #[builder(into)]
    interval: Duration,

    #[builder(default = Heartbeat::disabled())]
    heartbeat: Heartbeat,

    #[builder(skip)]
    cache: ChangeCache,

    /// The very first poll sees every inverter as changed, so it only warms up the cache.
    #[builder(skip = true)]
    is_first: bool,
}

impl<D: Device, C: Collector> Scraper<D, C> {
    /// Poll forever. The first poll happens immediately.
    pub async fn run(mut self) {
        info!(interval = ?self.interval, envoy_serial = %self.envoy_serial, "running…");
        loop {
            if !self.is_first {
                sleep(self.interval).await;
            }
            match self.poll().await {
                Ok(_) => self.heartbeat.send().await,
                Err(error) => error!("poll failed: {error:#}"),
            }
        }
    }

    /// Single iteration. The bootstrap flag is cleared even if fetching fails.
    #[instrument(skip_all)]
    pub async fn poll(&mut self) -> Result<PollSummary> {
        let is_first = std::mem::replace(&mut self.is_first, false);

        let inverters = self.device.get_inverters().await?;
        let n_fetched = inverters.len();
        let delta =
            inverters.into_iter().filter(|inverter| self.cache.update(inverter)).collect_vec();

        let n_forwarded = if is_first || delta.is_empty() {
            0
        } else {
            self.collector.send(&self.envoy_serial, &delta).await;
            delta.len()
        };

        info!(
            n_fetched,
            n_changed = delta.len(),
            n_forwarded,
            n_known = self.cache.len(),
            is_first,
            "fetch complete"
        );
        Ok(PollSummary { n_fetched, n_changed: delta.len(), n_forwarded })
    }
}
