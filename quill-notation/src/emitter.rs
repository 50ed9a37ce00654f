//! Output Emitter
//!
//! Abstraction for output production during printing.

/// Trait for emitting printed output.
///
/// The printer writes to an emitter while walking a notation. Indentation
/// prefixes arrive as ordinary text.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);
}

/// String-based emitter for in-memory printing.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    /// Create a new string emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Get the current buffer contents without consuming.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Ensure the output ends with a single newline.
    pub fn ensure_trailing_newline(&mut self) {
        if !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    /// Get the printed output.
    pub fn output(self) -> String {
        self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }
}
