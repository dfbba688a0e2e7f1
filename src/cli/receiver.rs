use clap::{Parser, builder::NonEmptyStringValueParser};
use reqwest::Url;

#[derive(Parser)]
pub struct ReceiverArgs {
    /// Receiver endpoint, for example `https://example.com/api/v1/envoy/inverters`.
    #[clap(long = "url", env = "ENVOY_RECEIVER_URL")]
    pub url: Url,

    /// Shared secret, sent in `x-flameorg-auth`.
    #[clap(
        long = "secret",
        env = "ENVOY_RECEIVER_SECRET",
        value_parser = NonEmptyStringValueParser::new(),
        hide_env_values = true
    )]
    pub secret: String,
}
