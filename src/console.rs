//! Console output streams with terminal colours.
//!
//! Three sinks: default output on stdout, warnings and errors on stderr in yellow and red.
//! Colour sequences are only emitted when the stream is attached to a terminal.

use std::io::IsTerminal;

/// ANSI colour codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const RESET: &str = "\x1b[0m";
}

pub struct Console {
    color_stderr: bool,
}

impl Console {
    pub fn new() -> Console {
        Console { color_stderr: std::io::stderr().is_terminal() }
    }

    pub fn output(&self, message: &str) {
        println!("{}", message);
    }

    pub fn warning(&self, message: &str) {
        if self.color_stderr {
            eprintln!("{}{}{}", colors::WARNING, message, colors::RESET);
        } else {
            eprintln!("{}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.color_stderr {
            eprintln!("{}{}{}", colors::ERROR, message, colors::RESET);
        } else {
            eprintln!("{}", message);
        }
    }
}

impl Default for Console {
    fn default() -> Console {
        Console::new()
    }
}
