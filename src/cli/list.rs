use std::path::Path;

use anyhow::Context;
use chime::{Clock, Reminder, SystemClock};
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::instrument;

use super::{
    display_due,
    terminal::{self, Colorize},
    Session,
};

/// Narrowest the text column is squeezed to before the table overflows.
const MIN_TEXT_WIDTH: usize = 12;

/// Command arguments for `chime list`.
#[derive(Debug, Default, Parser)]
pub struct List {
    /// Leave completed reminders out.
    #[arg(long)]
    hide_completed: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let session = Session::open(root);
        let now = SystemClock.now();

        let rows: Vec<Row> = session
            .store
            .list(!self.hide_completed)
            .map(|reminder| Row::new(reminder, now))
            .collect();

        match self.output {
            OutputFormat::Table => render_table(&rows, terminal::terminal_width()),
            OutputFormat::Json => render_json(&rows)?,
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Pending,
    Overdue,
    Completed,
}

impl Status {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Pending => "•",
            Self::Overdue => "!",
            Self::Completed => "✓",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Row {
    id: u64,
    text: String,
    due: String,
    notify_before: u32,
    status: Status,
    notified: bool,
    due_notified: bool,
}

impl Row {
    fn new(reminder: &Reminder, now: NaiveDateTime) -> Self {
        let status = if reminder.is_completed() {
            Status::Completed
        } else if reminder.due_at().is_ok_and(|due| due <= now) {
            Status::Overdue
        } else {
            Status::Pending
        };

        Self {
            id: reminder.id().get(),
            text: reminder.text().to_string(),
            due: display_due(reminder),
            notify_before: reminder.notify_before(),
            status,
            notified: reminder.is_notified(),
            due_notified: reminder.is_due_notified(),
        }
    }

    fn cells(&self) -> [String; 4] {
        let notify = if self.notify_before == 0 {
            "-".to_string()
        } else {
            format!("{}m", self.notify_before)
        };
        [
            format!("{} {}", self.status.symbol(), self.id),
            self.due.clone(),
            notify,
            self.text.clone(),
        ]
    }
}

const HEADERS: [&str; 4] = ["ID", "Due", "Notify", "Reminder"];

fn render_table(rows: &[Row], width: Option<usize>) {
    if rows.is_empty() {
        println!("{}", "No reminders".dim());
        return;
    }

    let cells: Vec<[String; 4]> = rows.iter().map(Row::cells).collect();
    let widths = column_widths(&cells, width);

    println!("{}", format_line(&HEADERS.map(String::from), &widths));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );

    for (row, cells) in rows.iter().zip(&cells) {
        let line = format_line(cells, &widths);
        let line = match row.status {
            Status::Pending => line,
            Status::Overdue => line.alert(),
            Status::Completed => line.dim(),
        };
        println!("{line}");
    }
}

/// Column widths, with the text column shrunk to fit `available` columns.
fn column_widths(cells: &[[String; 4]], available: Option<usize>) -> [usize; 4] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    if let Some(available) = available {
        let fixed: usize = widths[..3].iter().sum::<usize>() + 2 * 3;
        let room = available.saturating_sub(fixed).max(MIN_TEXT_WIDTH);
        widths[3] = widths[3].min(room);
    }
    widths
}

fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = truncate(cell, *width);
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn render_json(rows: &[Row]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), rows).context("failed to render json output")?;
    println!();
    Ok(())
}
