//! CLI presenter for output formatting

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::CaptureReport;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    is_spinner_active: Arc<AtomicBool>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: None,
            is_spinner_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
        self.is_spinner_active.store(true, Ordering::SeqCst);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format the live recording status line
    pub fn format_recording_status(
        &self,
        elapsed_ms: u64,
        samples: u64,
        limit_ms: Option<u64>,
    ) -> String {
        let elapsed = format_clock(elapsed_ms);
        match limit_ms {
            Some(total_ms) => {
                let percent = if total_ms > 0 {
                    (elapsed_ms as f64 / total_ms as f64 * 100.0).min(100.0)
                } else {
                    0.0
                };

                let bar_width = 20;
                let filled = ((percent / 100.0) * bar_width as f64) as usize;
                let empty = bar_width - filled;

                format!(
                    "[{}{}] {} / {} ({} samples)",
                    "█".repeat(filled).cyan(),
                    "░".repeat(empty),
                    elapsed,
                    format_clock(total_ms),
                    samples
                )
            }
            None => format!("{} ({} samples)", elapsed, samples),
        }
    }

    /// Show a spinner for recording
    pub fn show_recording_progress(&mut self, message: &str) {
        self.start_spinner(message);
    }

    /// Update recording progress
    pub fn update_recording_progress(&self, elapsed_ms: u64, samples: u64, limit_ms: Option<u64>) {
        let status = self.format_recording_status(elapsed_ms, samples, limit_ms);
        self.update_spinner(&format!("Recording... {}", status));
    }

    /// Print the summary line for a finished capture
    pub fn capture_summary(&self, report: &CaptureReport) {
        self.success(&format!(
            "Saved {} ({} samples, {} bytes, {:.2}s at {})",
            report.path.display(),
            report.samples,
            report.bytes,
            report.duration_secs(),
            report.sample_rate
        ));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// `mm:ss`, or `h:mm:ss` past the hour
fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_without_limit() {
        let presenter = Presenter::new();
        let status = presenter.format_recording_status(65_400, 2_884_140, None);
        assert_eq!(status, "01:05 (2884140 samples)");
    }

    #[test]
    fn status_with_limit_at_start() {
        let presenter = Presenter::new();
        let status = presenter.format_recording_status(0, 0, Some(10_000));
        assert!(status.contains("00:00 / 00:10"));
        assert!(status.contains("(0 samples)"));
    }

    #[test]
    fn status_with_limit_at_end() {
        let presenter = Presenter::new();
        let status = presenter.format_recording_status(12_000, 1, Some(10_000));
        assert!(status.contains("00:12 / 00:10"));
    }

    #[test]
    fn clock_rolls_into_hours() {
        assert_eq!(format_clock(59_999), "00:59");
        assert_eq!(format_clock(3_661_000), "1:01:01");
    }
}
