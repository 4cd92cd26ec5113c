//! Tree-walking driver.
//!
//! [`Generator`] visits a compilation unit top to bottom, threading the
//! [`ScopeId`](crate::scope::ScopeId) in effect through every call, and writes all output through
//! one [`OutputBuffer`]. Construct-specific lowering lives in submodules:
//!
//! - `stmt`: host-language statements and the `@`-directives
//! - `expr`: expressions and parenthesization
//! - `refs`: `@ref` / `@deref` and reference parameters
//! - `message`: message sends
//! - `class`, `protocol`, `typedef`: declaration emission
//! - `function`: function and method bodies

mod class;
mod expr;
mod function;
mod message;
mod protocol;
mod refs;
mod stmt;
mod typedef;

use objj_diagnostic::Diagnostic;
use objj_ir::{MethodKind, Program};

use crate::buffer::{OutputBuffer, StringBuffer};
use crate::environment::Environment;
use crate::globals;
use crate::options::CompileOptions;
use crate::scope::{hoisted_declarations, DeclKind, ScopeTree};
use crate::{CompileError, CompileOutput, Dependency};

/// Lowering state for one compilation unit.
pub struct Generator<'a, B: OutputBuffer = StringBuffer> {
    env: &'a mut Environment,
    options: &'a CompileOptions,
    scopes: ScopeTree,
    buffer: B,
    /// Receiver temporaries, one frame per function body.
    temps: Vec<TempFrame>,
    /// Enclosing method, if any.
    method: Option<MethodContext>,
    warnings: Vec<Diagnostic>,
    dependencies: Vec<Dependency>,
}

#[derive(Default, Debug)]
struct TempFrame {
    live: u32,
    max: u32,
}

/// Method being lowered, for `super` sends.
#[derive(Clone, Debug)]
struct MethodContext {
    kind: MethodKind,
    /// Expression naming the superclass, computed once per class.
    super_class: String,
}

impl<'a, B: OutputBuffer> Generator<'a, B> {
    pub fn new(buffer: B, env: &'a mut Environment, options: &'a CompileOptions) -> Self {
        Generator {
            env,
            options,
            scopes: ScopeTree::new(),
            buffer,
            temps: Vec::new(),
            method: None,
            warnings: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Lower `program`, consuming the generator.
    pub fn generate(mut self, program: &Program) -> Result<CompileOutput, CompileError> {
        let collected = globals::collect(program, self.env);
        self.warnings.extend(collected.warnings);

        let root = ScopeTree::ROOT;
        for (ident, kind) in hoisted_declarations(&program.body) {
            self.scopes.declare(root, &ident.name, kind, ident.span)?;
        }
        let global_names = collected
            .declared
            .iter()
            .chain(collected.implicit.iter().map(|g| &g.name));
        for name in global_names {
            self.scopes
                .declare(root, name, DeclKind::Global, program.span)?;
        }

        let (body, temps) =
            self.emit_in_frame(|gen| gen.emit_top_level_statements(&program.body, root))?;

        if self.options.emit_globals_preamble && !collected.implicit.is_empty() {
            let names: Vec<&str> = collected.implicit.iter().map(|g| g.name.as_str()).collect();
            self.buffer
                .concat_fmt(format_args!("/* global {} */", names.join(", ")));
            self.buffer.concat_newline();
        }
        if temps > 0 {
            self.concat_temp_declarations(temps);
            self.buffer.concat_newline();
        }
        self.buffer.concat_buffer(body);

        Ok(CompileOutput {
            code: self.buffer.into_output(),
            dependencies: self.dependencies,
            globals: collected.implicit,
            warnings: self.warnings,
        })
    }

    /// Run `emit` against a fresh buffer in a new temporary frame.
    ///
    /// Returns the emitted text and the number of temporaries the frame
    /// needs declared.
    fn emit_in_frame<F>(&mut self, emit: F) -> Result<(B, u32), CompileError>
    where
        F: FnOnce(&mut Self) -> Result<(), CompileError>,
    {
        let forked = self.buffer.fork();
        let outer = std::mem::replace(&mut self.buffer, forked);
        self.temps.push(TempFrame::default());
        let result = emit(self);
        let frame = self.temps.pop().unwrap_or_default();
        let inner = std::mem::replace(&mut self.buffer, outer);
        result.map(|()| (inner, frame.max))
    }

    /// `var ___r1, ___r2;`
    fn concat_temp_declarations(&mut self, count: u32) {
        let names: Vec<String> = (1..=count).map(temp_name).collect();
        self.buffer
            .concat_fmt(format_args!("var {};", names.join(", ")));
    }

    /// Reserve a receiver temporary in the innermost function frame.
    fn acquire_temp(&mut self) -> String {
        match self.temps.last_mut() {
            Some(frame) => {
                frame.live += 1;
                frame.max = frame.max.max(frame.live);
                temp_name(frame.live)
            }
            None => temp_name(1),
        }
    }

    fn release_temp(&mut self) {
        if let Some(frame) = self.temps.last_mut() {
            frame.live = frame.live.saturating_sub(1);
        }
    }

    /// Run `inner`, wrapped in parentheses when `wrap` is set.
    ///
    /// The wrapped text is emitted into a fork and spliced back through
    /// [`OutputBuffer::concat_parenthesized_block`].
    fn parenthesized<F>(&mut self, wrap: bool, inner: F) -> Result<(), CompileError>
    where
        F: FnOnce(&mut Self) -> Result<(), CompileError>,
    {
        if !wrap {
            return inner(self);
        }
        let forked = self.buffer.fork();
        let outer = std::mem::replace(&mut self.buffer, forked);
        let result = inner(self);
        let wrapped = std::mem::replace(&mut self.buffer, outer);
        self.buffer
            .concat_parenthesized_block(|buffer| buffer.concat_buffer(wrapped));
        result
    }

    /// Append `text` as a double-quoted string literal.
    fn concat_quoted(&mut self, text: &str) {
        self.buffer.concat(&quote(text));
    }
}

fn temp_name(index: u32) -> String {
    format!("___r{index}")
}

/// Double-quoted string literal with escapes.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
