//! `chime`: a reminder list with scheduled notifications, driven from the
//! terminal.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
