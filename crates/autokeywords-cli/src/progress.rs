//! Progress reporting for bulk runs

use std::io::{self, Write};

/// Simple progress reporter for CLI commands
pub struct ProgressReporter {
    total: usize,
    processed: usize,
    failed: usize,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            failed: 0,
        }
    }

    pub fn set_message(&self, msg: &str) {
        eprint!("\r[{}/{}] {:<50}", self.processed, self.total, msg);
        io::stderr().flush().ok();
    }

    pub fn record(&mut self, success: bool) {
        self.processed += 1;
        if !success {
            self.failed += 1;
        }
    }

    pub fn finish(&self) {
        eprintln!(
            "\rDone ({}/{}, {} failed)                    ",
            self.processed, self.total, self.failed
        );
    }
}
