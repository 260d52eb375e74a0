use std::{io::Write, time::Duration};

use chime::{domain::countdown::Tick, Countdown};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Timer {
    /// How long to count down, as MM:SS
    duration: String,
}

impl Timer {
    #[instrument(level = "debug")]
    pub fn run(self) -> anyhow::Result<()> {
        let seconds = Countdown::parse(&self.duration)?;
        if seconds == 0 {
            anyhow::bail!("countdown must be longer than 00:00");
        }

        let mut countdown = Countdown::new();
        countdown.start(seconds);

        let bar = ProgressBar::new(u64::from(seconds));
        bar.set_style(ProgressStyle::with_template("{bar:40} {msg}")?);
        bar.set_message(countdown.to_string());

        loop {
            std::thread::sleep(Duration::from_secs(1));
            match countdown.tick() {
                Tick::Remaining(_) => {
                    bar.inc(1);
                    bar.set_message(countdown.to_string());
                }
                Tick::Finished => {
                    bar.finish_with_message(countdown.to_string());
                    break;
                }
                Tick::Inactive => {
                    bar.abandon();
                    return Ok(());
                }
            }
        }

        println!("{}", "⏰ Time's up!".alert());
        let mut stdout = std::io::stdout();
        if stdout.write_all(b"\x07").and_then(|()| stdout.flush()).is_err() {
            tracing::debug!("Could not ring the terminal bell");
        }
        Ok(())
    }
}
