mod settings;
mod show;
mod watch;

use clap::{Parser, Subcommand};

pub use self::{
    settings::SettingsArgs,
    show::{print_attributes, show},
    watch::WatchArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: keep polling the prices and log the current one.
    #[clap(name = "watch")]
    Watch(WatchArgs),

    /// Fetch the prices once and render the ranked tables.
    #[clap(name = "show")]
    Show,

    /// Fetch the prices once and print the attributes as JSON.
    #[clap(name = "attributes")]
    Attributes,
}
