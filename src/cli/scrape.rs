use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::{
    api::{heartbeat::Heartbeat, receiver},
    cli::{EnvoyArgs, ReceiverArgs},
    core::scraper::Scraper,
    prelude::*,
};

#[derive(Parser)]
pub struct ScrapeArgs {
    #[clap(flatten)]
    pub envoy: EnvoyArgs,

    #[clap(flatten)]
    pub receiver: ReceiverArgs,

    #[clap(long, env = "ENVOY_POLLING_INTERVAL", default_value = "1min")]
    pub polling_interval: humantime::Duration,

    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    pub heartbeat_url: Option<Url>,
}

impl ScrapeArgs {
    pub async fn run(self) -> Result {
        let device = self.envoy.connect()?;
        let timeout: Duration = self.envoy.timeout.into();
        let collector = receiver::Api::new(self.receiver.url, self.receiver.secret, timeout)?;
        let heartbeat = Heartbeat::new(self.heartbeat_url, timeout)?;
        Scraper::builder()
            .device(device)
            .collector(collector)
            .envoy_serial(self.envoy.installer.serial)
            .interval(self.polling_interval)
            .heartbeat(heartbeat)
            .build()
            .run()
            .await;
        Ok(())
    }
}
