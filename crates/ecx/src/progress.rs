use colored::Colorize;
use ecx_core::{Reporter, Step, StepOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner while a step runs, one status line once it is finished
#[derive(Default)]
pub struct SpinnerReporter {
    spinner: Option<ProgressBar>,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for SpinnerReporter {
    fn started(&mut self, step: &Step) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(step.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn progress(&mut self, step: &Step, detail: &str) {
        if let Some(pb) = &self.spinner {
            pb.set_message(format!("{} ({})", step, detail));
        }
    }

    fn finished(&mut self, step: &Step, outcome: &StepOutcome) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }

        match outcome {
            StepOutcome::Created => println!("{} {} {}", "✓".green(), step, "created".green()),
            StepOutcome::Reused => println!("{} {} {}", "✓".green(), step, "reused".cyan()),
            StepOutcome::Skipped => println!("{}", format!("- {} skipped", step).dimmed()),
            StepOutcome::Failed(reason) => {
                println!("{} {}", "✗".red(), step.to_string().red().bold());
                println!("  {}", reason);
            }
        }
    }
}
