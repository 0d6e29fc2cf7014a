//! Progress display utilities for long-running operations

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const SPINNER_UPDATE_INTERVAL_MS: u64 = 100;
const CLEAR_LINE_WIDTH: usize = 100;

/// Simple spinner to show progress of asynchronous operations
pub struct ProgressSpinner {
    message: String,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProgressSpinner {
    pub fn new(message: String) -> Self {
        Self {
            message,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start spinning on a dedicated thread until stopped.
    pub fn start(&mut self) {
        self.running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.running);
        let message = self.message.clone();

        let handle = thread::spawn(move || {
            let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut index = 0;

            while running.load(Ordering::Relaxed) {
                print!("\r{} {}", spinner_chars[index], message);
                let _ = io::stdout().flush();

                index = (index + 1) % spinner_chars.len();
                thread::sleep(Duration::from_millis(SPINNER_UPDATE_INTERVAL_MS));
            }

            print!("\r{:<width$}\r", "", width = CLEAR_LINE_WIDTH);
            let _ = io::stdout().flush();
        });

        self.handle = Some(handle);
    }

    /// Stop the spinner, optionally printing a completion message.
    pub fn stop(&mut self, completion_message: Option<&str>) {
        self.running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        if let Some(msg) = completion_message {
            println!(" {}", msg);
            let _ = io::stdout().flush();
        }
    }
}

impl Drop for ProgressSpinner {
    fn drop(&mut self) {
        self.stop(None);
    }
}

/// Types of operation status
#[derive(Debug, Clone)]
pub enum OperationStatus {
    Success,
    Warning,
    Error,
}

/// Display operation status with a consistent symbol prefix.
pub fn display_status(operation: &str, status: OperationStatus) {
    let symbol = match status {
        OperationStatus::Success => "✅",
        OperationStatus::Warning => "⚠️",
        OperationStatus::Error => "❌",
    };

    // Leading space keeps terminals from clipping the emoji.
    println!(" {} {}", symbol, operation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_stop_without_start_is_harmless() {
        let mut spinner = ProgressSpinner::new("working...".to_string());
        spinner.stop(None);
        spinner.stop(Some("done"));
    }

    #[test]
    fn test_spinner_start_stop() {
        let mut spinner = ProgressSpinner::new("fetching...".to_string());
        spinner.start();
        spinner.stop(None);
        assert!(spinner.handle.is_none());
    }
}
