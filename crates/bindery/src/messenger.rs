//! Output sinks for usage text and diagnostics.
//!
//! The dispatcher never prints directly. Everything meant for the end user
//! goes through a [`Messenger`], so tests can capture the exact lines.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives user-facing lines.
pub trait Messenger {
    fn write(&mut self, line: &str);
}

// === Real implementation ===

/// Writes every line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMessenger;

impl Messenger for ConsoleMessenger {
    fn write(&mut self, line: &str) {
        println!("{line}");
    }
}

// === Recording implementation for testing ===

/// Keeps every written line in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// dispatcher and inspect the other afterwards.
///
/// ```rust
/// use bindery::{Messenger, RecordingMessenger};
///
/// let recorder = RecordingMessenger::new();
/// let mut sink = recorder.clone();
/// sink.write("usage: tool");
/// assert_eq!(recorder.lines(), vec!["usage: tool"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingMessenger {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// All lines joined with newlines.
    pub fn output(&self) -> String {
        self.lines.borrow().join("\n")
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl Messenger for RecordingMessenger {
    fn write(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

impl<M: Messenger + ?Sized> Messenger for &mut M {
    fn write(&mut self, line: &str) {
        (**self).write(line);
    }
}

impl<M: Messenger + ?Sized> Messenger for Box<M> {
    fn write(&mut self, line: &str) {
        (**self).write(line);
    }
}
