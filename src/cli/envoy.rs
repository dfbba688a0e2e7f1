use clap::{ArgAction, Parser, builder::NonEmptyStringValueParser};

use crate::{
    api::{digest::Credentials, envoy},
    core::password,
    prelude::*,
};

#[derive(Parser)]
pub struct InstallerArgs {
    /// Envoy serial number.
    #[clap(long = "serial", env = "ENVOY_SERIAL", value_parser = NonEmptyStringValueParser::new())]
    pub serial: String,

    /// Installer user name, also salts the derived password.
    #[clap(
        long = "username",
        env = "ENVOY_USERNAME",
        default_value = "installer",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub username: String,
}

impl InstallerArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: password::derive(&self.serial, &self.username),
        }
    }
}

#[derive(Parser)]
pub struct EnvoyArgs {
    #[clap(flatten)]
    pub installer: InstallerArgs,

    /// Envoy host name or IP address.
    #[clap(long = "host", env = "ENVOY_HOST", value_parser = NonEmptyStringValueParser::new())]
    pub host: String,

    /// Bearer token for firmware which dropped Digest authentication.
    ///
    /// When set, the Envoy is queried over HTTPS.
    #[clap(long = "token", env = "ENVOY_TOKEN", value_parser = NonEmptyStringValueParser::new())]
    pub token: Option<String>,

    /// Accept the self-signed Envoy certificate (bearer token only).
    #[clap(
        long = "accept-invalid-certs",
        env = "ENVOY_ACCEPT_INVALID_CERTS",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub accept_invalid_certs: bool,

    /// Request timeout, for both the Envoy and the receiver.
    #[clap(long = "timeout", env = "ENVOY_TIMEOUT", default_value = "15s")]
    pub timeout: humantime::Duration,
}

impl EnvoyArgs {
    pub fn connect(&self) -> Result<envoy::Api> {
        match &self.token {
            Some(token) => envoy::Api::bearer(
                &self.host,
                token.clone(),
                self.timeout.into(),
                self.accept_invalid_certs,
            ),
            None => envoy::Api::digest(&self.host, self.installer.credentials(), self.timeout.into()),
        }
    }
}
