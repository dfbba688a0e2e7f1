use clap::{Parser, Subcommand};

use crate::{
    cli::{EnvoyArgs, InstallerArgs},
    core::password,
    prelude::*,
    tables::build_inverters_table,
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    pub command: BurrowCommand,
}

#[derive(Subcommand)]
pub enum BurrowCommand {
    /// Print the installer password derived from the serial number.
    #[clap(name = "password")]
    Password(InstallerArgs),

    /// Fetch the inverters once and print them.
    #[clap(name = "inverters")]
    Inverters(Box<EnvoyArgs>),
}

impl BurrowArgs {
    pub async fn run(self) -> Result {
        match self.command {
            BurrowCommand::Password(args) => {
                println!("{}", password::derive(&args.serial, &args.username));
            }
            BurrowCommand::Inverters(args) => {
                let inverters = args.connect()?.get_inverters().await?;
                info!(n_inverters = inverters.len(), "gotcha");
                println!("{}", build_inverters_table(&inverters));
            }
        }
        Ok(())
    }
}
