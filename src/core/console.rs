//! User-facing announcements, threaded explicitly through every command call.
//!
//! Section titles and progress lines go to stderr so stdout stays free for the
//! JSON response envelope. Tests use a capture sink to assert what was shown.

use std::cell::RefCell;

pub struct IoContext {
    sink: Sink,
}

enum Sink {
    Terminal { quiet: bool },
    Capture(RefCell<Vec<String>>),
}

impl IoContext {
    pub fn terminal(quiet: bool) -> Self {
        Self {
            sink: Sink::Terminal { quiet },
        }
    }

    /// Record announcements in memory instead of printing them.
    pub fn capture() -> Self {
        Self {
            sink: Sink::Capture(RefCell::new(Vec::new())),
        }
    }

    pub fn announce_section(&self, title: &str) {
        match &self.sink {
            Sink::Terminal { quiet: true } => {}
            Sink::Terminal { quiet: false } => {
                eprintln!();
                eprintln!("{}", title);
                eprintln!("{}", "=".repeat(title.chars().count()));
            }
            Sink::Capture(lines) => lines.borrow_mut().push(format!("# {}", title)),
        }
    }

    pub fn announce_line(&self, message: &str) {
        match &self.sink {
            Sink::Terminal { quiet: true } => {}
            Sink::Terminal { quiet: false } => eprintln!(" {}", message),
            Sink::Capture(lines) => lines.borrow_mut().push(message.to_string()),
        }
    }

    /// Everything announced so far. Empty for terminal sinks.
    pub fn transcript(&self) -> Vec<String> {
        match &self.sink {
            Sink::Capture(lines) => lines.borrow().clone(),
            Sink::Terminal { .. } => Vec::new(),
        }
    }
}
