use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use scene_db_core::{Error, RepositoryReporter};
use std::path::Path;
use std::sync::Mutex;

/// Terminal reporter: a spinner while a scope is scanned, one status line
/// per saved version or reference change.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    /// Print above the spinner when one is running.
    fn println(&self, line: String) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.println(line);
                return;
            }
        }
        eprintln!("{}", line);
    }
}

impl RepositoryReporter for CliReporter {
    fn on_scan_start(&self, category: &str, sub_project: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(format!("Reading {}/{}...", category, sub_project));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_record_loaded(&self, name: &str) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(format!("Reading... {}", name));
            }
        }
    }

    fn on_corrupt_record(&self, path: &Path, error: &Error) {
        self.println(format!(
            "  {} Skipped {}: {}",
            "!".yellow(),
            path.display(),
            error
        ));
    }

    fn on_scan_complete(&self, records: usize, corrupt: usize) {
        self.finish_bar();
        if corrupt > 0 {
            eprintln!(
                "  {} {} base scenes, {} unreadable records",
                "✓".green(),
                records,
                format!("{}", corrupt).red()
            );
        } else {
            eprintln!("  {} {} base scenes", "✓".green(), records);
        }
    }

    fn on_version_saved(&self, name: &str, version: u32) {
        eprintln!("  {} {} v{} saved", "✓".green(), name, version);
    }

    fn on_reference_updated(&self, name: &str, version: Option<u32>) {
        match version {
            Some(version) => eprintln!(
                "  {} {} now references v{}",
                "✓".green(),
                name,
                version
            ),
            None => eprintln!("  {} {} reference cleared", "✓".green(), name),
        }
    }

    fn on_dangling_reference(&self, name: &str, error: &Error) {
        eprintln!("  {} {}: {}", "✗".red(), name, error);
    }
}
