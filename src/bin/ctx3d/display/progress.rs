use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(80);

/// Spinner line for the running step, replaced by a check mark and timing
/// once the step completes.
struct StepSpinner {
    spinner: Option<ProgressBar>,
    run_started: Instant,
    step_started: Instant,
    current: u8,
    total: u8,
}

impl StepSpinner {
    fn new(total: u8) -> Self {
        let now = Instant::now();
        Self {
            spinner: None,
            run_started: now,
            step_started: now,
            current: 0,
            total,
        }
    }

    fn begin(&mut self, description: &str) {
        self.stop_spinner();
        self.current += 1;
        self.step_started = Instant::now();

        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("◐◓◑◒✓");
        let spinner = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(format!("[{}/{}] {description}...", self.current, self.total));
        spinner.enable_steady_tick(TICK);
        self.spinner = Some(spinner);
    }

    fn complete(&mut self, description: &str, details: &[String]) {
        self.stop_spinner();
        let took = seconds(self.step_started.elapsed());

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "  \x1b[32m✓\x1b[0m {description:<44} {took:>6}");
        for detail in details {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {detail}");
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn finish(mut self) {
        self.stop_spinner();
        let total = format!("Total: {}", seconds(self.run_started.elapsed()));

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        let _ = writeln!(stderr, "  \x1b[2m{}\x1b[0m", "┄".repeat(56));
        let _ = writeln!(stderr, "  \x1b[32m✓\x1b[0m Scene complete {total:>39}");
        let _ = writeln!(stderr);
    }
}

fn seconds(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

/// Step reporting for interactive runs; every call is a no-op otherwise.
pub struct Progress {
    spinner: Option<StepSpinner>,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        Self {
            spinner: interactive.then(|| StepSpinner::new(total_steps)),
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.begin(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, details: &[String]) {
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.complete(description, details);
        }
    }

    pub fn finish(self) {
        if let Some(spinner) = self.spinner {
            spinner.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_print_in_seconds() {
        assert_eq!(seconds(Duration::from_millis(1250)), "1.25s");
        assert_eq!(seconds(Duration::ZERO), "0.00s");
    }

    #[test]
    fn silent_progress_ignores_steps() {
        let mut progress = Progress::new(false, 3);
        progress.step("Reading structure");
        progress.complete_step("Reading structure", &["detail".to_string()]);
        assert!(progress.spinner.is_none());
        progress.finish();
    }
}
