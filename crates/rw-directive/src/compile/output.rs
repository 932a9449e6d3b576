//! Output context shared by the compiler and handlers.

use crate::error::CompileError;

/// Rendered output with a stack of capture buffers.
///
/// The compiler captures labels, attribute lists and container content
/// with [`buffer`](Self::buffer) and [`resume`](Self::resume). Handlers
/// write into whatever buffer is current.
///
/// # Example
///
/// ```
/// use rw_directive::Output;
///
/// let mut output = Output::new();
/// output.push("a");
/// output.buffer();
/// output.push("captured");
/// assert_eq!(output.resume().unwrap(), "captured");
/// assert_eq!(output.as_str(), "a");
/// ```
#[derive(Debug)]
pub struct Output {
    buffers: Vec<String>,
    line_ending: String,
    slurp_one_line_ending: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create an empty output using `\n` as the default line ending.
    #[must_use]
    pub fn new() -> Self {
        Self::with_line_ending("\n")
    }

    pub(crate) fn with_line_ending(line_ending: &str) -> Self {
        Self {
            buffers: vec![String::new()],
            line_ending: line_ending.to_owned(),
            slurp_one_line_ending: false,
        }
    }

    /// Append text to the current buffer.
    pub fn push(&mut self, text: &str) {
        if let Some(buffer) = self.buffers.last_mut() {
            buffer.push_str(text);
        }
    }

    /// Start capturing into a new buffer.
    pub fn buffer(&mut self) {
        self.buffers.push(String::new());
    }

    /// Stop capturing and return what the innermost buffer collected.
    pub fn resume(&mut self) -> Result<String, CompileError> {
        if self.buffers.len() < 2 {
            return Err(CompileError::BufferUnderflow);
        }
        self.buffers.pop().ok_or(CompileError::BufferUnderflow)
    }

    /// Text in the current buffer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.buffers.last().map_or("", String::as_str)
    }

    /// Line ending used when one has to be added.
    #[must_use]
    pub fn line_ending(&self) -> &str {
        &self.line_ending
    }

    /// Add a line ending unless the current buffer is empty or ends in one.
    pub fn line_ending_if_needed(&mut self) {
        let current = self.as_str();
        if current.is_empty() || current.ends_with(['\n', '\r']) {
            return;
        }
        let line_ending = self.line_ending.clone();
        self.push(&line_ending);
    }

    /// Drop the next line ending from the source.
    pub(crate) fn slurp_one_line_ending(&mut self) {
        self.slurp_one_line_ending = true;
    }

    /// Write a line ending token unless one is being slurped.
    pub(crate) fn source_line_ending(&mut self, text: &str) {
        if self.slurp_one_line_ending {
            self.slurp_one_line_ending = false;
        } else {
            self.push(text);
        }
    }

    pub(crate) fn finish(mut self) -> Result<String, CompileError> {
        match self.buffers.len() {
            1 => self.buffers.pop().ok_or(CompileError::BufferUnderflow),
            _ => Err(CompileError::BufferUnderflow),
        }
    }
}
