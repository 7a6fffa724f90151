use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

fn init_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn start(message: &str) {
    SPINNER.get_or_init(init_spinner).set_message(message.to_string());
}

pub fn report_transfer_progress(network: &str, done: usize, total: usize) {
    if let Some(pb) = SPINNER.get() {
        pb.set_message(format!(
            "[{}] {} of {} recipients processed...",
            network.bold(),
            done.to_string().green().bold(),
            total
        ));
    }
}

pub fn finish() {
    if let Some(pb) = SPINNER.get() {
        pb.finish_and_clear();
    }
}

/// Runs `f` with the spinner line cleared so output does not interleave with it.
pub fn suspend<F: FnOnce() -> R, R>(f: F) -> R {
    match SPINNER.get() {
        Some(pb) if !pb.is_finished() => pb.suspend(f),
        _ => f(),
    }
}

pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        suspend(|| std::io::stdout().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}
