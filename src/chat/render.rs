//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction for the transcript.  The default
//! implementation writes plain text and uses ANSI escape codes to tell the speakers apart.

use std::io::{self, Stdout, Write};

use crate::types::{Message, MessageRole};
use crate::utils::time::clock;

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for timestamps and the pending indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user's messages).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for the assistant's messages).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Label shown next to the assistant's messages.
pub const ASSISTANT_LABEL: &str = "Ye";

/// Label shown next to the user's messages.
pub const USER_LABEL: &str = "You";

/// Trait for rendering the chat transcript.
///
/// A renderer only ever reads the session's state; it never changes it.
pub trait Renderer: Send {
    /// Print one message from the transcript.
    fn render_message(&mut self, message: &Message);

    /// Print every message of a transcript in order.
    fn render_transcript(&mut self, messages: &[Message]) {
        for message in messages {
            self.render_message(message);
        }
    }

    /// Print the indicator shown while a reply is outstanding.
    fn print_pending(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            out: io::stdout(),
            use_color,
        }
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        // Best effort: write errors are ignored.
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Format one message as a transcript line.
pub fn format_message(message: &Message, use_color: bool) -> String {
    let (label, color) = match message.role() {
        MessageRole::User => (USER_LABEL, ANSI_CYAN),
        MessageRole::Assistant => (ASSISTANT_LABEL, ANSI_YELLOW),
    };
    let at = clock(&message.timestamp());
    if use_color {
        format!(
            "{ANSI_DIM}[{at}]{ANSI_RESET} {ANSI_BOLD}{color}{label}:{ANSI_RESET} {color}{}{ANSI_RESET}",
            message.content()
        )
    } else {
        format!("[{at}] {label}: {}", message.content())
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn render_message(&mut self, message: &Message) {
        let line = format_message(message, self.use_color);
        self.emit(&line);
    }

    fn print_pending(&mut self) {
        if self.use_color {
            self.emit(&format!("{ANSI_DIM}{ASSISTANT_LABEL} is typing...{ANSI_RESET}"));
        } else {
            self.emit(&format!("{ASSISTANT_LABEL} is typing..."));
        }
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            self.emit(&format!("{ANSI_RED}Error: {error}{ANSI_RESET}"));
        } else {
            self.emit(&format!("Error: {error}"));
        }
    }

    fn print_info(&mut self, info: &str) {
        self.emit(info);
    }
}
