use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;

/// Snapshot of the call stack at the point an error was constructed
///
/// Holds the caller location, which is always known, and a forced
/// backtrace, which depends on debug info being available. Symbol
/// resolution is deferred until the stack is rendered.
pub struct Stack {
    location: &'static Location<'static>,
    backtrace: Backtrace,
}

impl Stack {
    /// Capture the stack of the calling thread
    #[track_caller]
    pub fn capture() -> Self {
        Self {
            location: Location::caller(),
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Source location of the constructor call
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Rendered frames, most recent call first
    ///
    /// The first line is the construction site; the remaining lines come
    /// from the backtrace, one `function (file:line:col)` per frame.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "at {}:{}:{}",
            self.location.file(),
            self.location.line(),
            self.location.column()
        )];

        if self.backtrace.status() == BacktraceStatus::Captured {
            lines.extend(frames(&self.backtrace.to_string()));
        }

        lines
    }
}

/// Fold std's two-line frame layout into one line per frame
///
/// Leading frames of the capture machinery are dropped, and so is
/// everything from the runtime's `__rust_begin_short_backtrace` marker on.
fn frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    let mut skipping = false;

    for line in rendered.lines() {
        let trimmed = line.trim_start();

        if let Some(location) = trimmed.strip_prefix("at ") {
            if !skipping && let Some(last) = frames.last_mut() {
                last.push_str(" (");
                last.push_str(location);
                last.push(')');
            }
            continue;
        }

        let Some((index, symbol)) = trimmed.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        if symbol.contains("__rust_begin_short_backtrace") {
            break;
        }

        skipping = frames.is_empty() && is_capture_frame(symbol);
        if !skipping {
            frames.push(symbol.to_string());
        }
    }

    frames
}

/// Frames between the error constructor and `Backtrace::force_capture`
fn is_capture_frame(symbol: &str) -> bool {
    symbol.starts_with("std::backtrace")
        || symbol.starts_with("errcode_core::stack::")
        || symbol.starts_with("errcode_core::error::")
        || (symbol.starts_with('<') && symbol.contains(" as errcode_core::error::"))
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            write!(f, "\n    {line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("location", &self.location)
            .field("backtrace", &self.backtrace.status())
            .finish()
    }
}
