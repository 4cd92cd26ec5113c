//! Compilation options.

/// Where generated text goes.
///
/// Chosen once per compilation unit; emission logic never branches on it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmitMode {
    /// Produce generated code.
    #[default]
    Code,
    /// Only harvest declarations into the environment; no text is kept.
    Import,
}

/// Options for a single compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompileOptions {
    pub mode: EmitMode,
    /// Name method functions `$Class__selector_` instead of leaving them
    /// anonymous.
    pub include_method_function_names: bool,
    /// Append the `["ret", "arg", ...]` type signature to `objj_method`.
    pub include_method_argument_type_signatures: bool,
    /// Pass the declared type to `objj_ivar`.
    pub include_ivar_type_signatures: bool,
    /// Dispatch ordinary sends through the receiver's method table
    /// instead of the `objj_msgSendN` entry points.
    pub inline_msg_send: bool,
    /// Prefix the output with a `/* global ... */` comment.
    pub emit_globals_preamble: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            mode: EmitMode::Code,
            include_method_function_names: true,
            include_method_argument_type_signatures: true,
            include_ivar_type_signatures: true,
            inline_msg_send: false,
            emit_globals_preamble: false,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a declaration-harvesting run.
    pub fn import() -> Self {
        Self::default().with_mode(EmitMode::Import)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_method_function_names(mut self, enabled: bool) -> Self {
        self.include_method_function_names = enabled;
        self
    }

    #[must_use]
    pub fn with_method_argument_type_signatures(mut self, enabled: bool) -> Self {
        self.include_method_argument_type_signatures = enabled;
        self
    }

    #[must_use]
    pub fn with_ivar_type_signatures(mut self, enabled: bool) -> Self {
        self.include_ivar_type_signatures = enabled;
        self
    }

    #[must_use]
    pub fn with_inline_msg_send(mut self, enabled: bool) -> Self {
        self.inline_msg_send = enabled;
        self
    }

    #[must_use]
    pub fn with_globals_preamble(mut self, enabled: bool) -> Self {
        self.emit_globals_preamble = enabled;
        self
    }
}
