mod burrow;
mod envoy;
mod receiver;
mod scrape;

use std::ffi::OsString;

use clap::{Parser, Subcommand};

pub use self::{
    burrow::BurrowArgs,
    envoy::{EnvoyArgs, InstallerArgs},
    receiver::ReceiverArgs,
    scrape::ScrapeArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the Envoy and forward the changed inverter readings to the receiver.
    #[clap(name = "scrape")]
    Scrape(Box<ScrapeArgs>),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}

/// Drop the long options given an empty value, so that they fall back to the environment.
///
/// Both `--option ""` and `--option=` are dropped. Every long option here takes a value.
pub fn non_empty_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into).peekable();
    let mut kept = Vec::new();
    while let Some(arg) = args.next() {
        let is_empty = match arg.to_str() {
            Some(option) if option.len() > 2 && option.starts_with("--") => {
                option.ends_with('=')
                    || (!option.contains('=')
                        && args.next_if(|value| value.is_empty()).is_some())
            }
            _ => false,
        };
        if !is_empty {
            kept.push(arg);
        }
    }
    kept
}
