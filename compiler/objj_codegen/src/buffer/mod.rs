//! Output Buffer
//!
//! Abstraction for text production during lowering.
//!
//! Two implementations share one contract:
//! - [`StringBuffer`] accumulates generated code.
//! - [`NoopBuffer`] discards text but still runs every callback handed to
//!   it, so emission logic keeps its non-text side effects (scope and
//!   environment population) in import mode.
//!
//! The generator is generic over the buffer; the choice is made once per
//! compilation unit.

use std::fmt;

/// Position in a buffer, used to retract speculative emission.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Mark(usize);

/// Trait for emitting generated text.
pub trait OutputBuffer {
    /// Append a text fragment.
    fn concat(&mut self, text: &str);

    /// Append formatted text (`format_args!` slots).
    fn concat_fmt(&mut self, args: fmt::Arguments<'_>);

    /// Start a new line at the current indentation.
    fn concat_newline(&mut self);

    /// Increase indentation for subsequent lines.
    fn indent(&mut self);

    /// Decrease indentation for subsequent lines.
    fn dedent(&mut self);

    /// Current end of the buffer.
    fn mark(&self) -> Mark;

    /// Drop everything emitted after `mark`.
    fn remove(&mut self, mark: Mark);

    /// Splice another buffer's text onto the end of this one.
    fn concat_buffer(&mut self, other: Self)
    where
        Self: Sized;

    /// An empty buffer of the same kind at the same indentation.
    fn fork(&self) -> Self
    where
        Self: Sized;

    /// Accumulated text, or `None` for a no-op buffer.
    fn into_output(self) -> Option<String>
    where
        Self: Sized;

    fn concat_left_paren(&mut self) {
        self.concat("(");
    }

    fn concat_right_paren(&mut self) {
        self.concat(")");
    }

    fn concat_comma(&mut self) {
        self.concat(", ");
    }

    /// Append a binary operator surrounded by spaces.
    fn concat_operator(&mut self, op: &str) {
        self.concat(" ");
        self.concat(op);
        self.concat(" ");
    }

    /// Run `inner` between a pair of parentheses.
    fn concat_parenthesized_block<F>(&mut self, inner: F)
    where
        Self: Sized,
        F: FnOnce(&mut Self),
    {
        self.concat_left_paren();
        inner(self);
        self.concat_right_paren();
    }
}

/// String-backed buffer producing the generated code.
#[derive(Default, Debug)]
pub struct StringBuffer {
    text: String,
    indent: usize,
}

impl StringBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents without consuming.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl OutputBuffer for StringBuffer {
    fn concat(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn concat_fmt(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = fmt::Write::write_fmt(&mut self.text, args);
    }

    fn concat_newline(&mut self) {
        self.text.push('\n');
        for _ in 0..self.indent {
            self.text.push_str("    ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    fn mark(&self) -> Mark {
        Mark(self.text.len())
    }

    fn remove(&mut self, mark: Mark) {
        self.text.truncate(mark.0);
    }

    fn concat_buffer(&mut self, other: Self) {
        self.text.push_str(&other.text);
    }

    fn fork(&self) -> Self {
        StringBuffer {
            text: String::new(),
            indent: self.indent,
        }
    }

    fn into_output(self) -> Option<String> {
        Some(self.text)
    }
}

/// Buffer that keeps nothing. Used for import-mode runs.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoopBuffer;

impl OutputBuffer for NoopBuffer {
    fn concat(&mut self, _text: &str) {}

    fn concat_fmt(&mut self, _args: fmt::Arguments<'_>) {}

    fn concat_newline(&mut self) {}

    fn indent(&mut self) {}

    fn dedent(&mut self) {}

    fn mark(&self) -> Mark {
        Mark(0)
    }

    fn remove(&mut self, _mark: Mark) {}

    fn concat_buffer(&mut self, _other: Self) {}

    fn fork(&self) -> Self {
        NoopBuffer
    }

    fn into_output(self) -> Option<String> {
        None
    }
}
