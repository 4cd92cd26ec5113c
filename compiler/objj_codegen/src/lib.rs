//! Objective-J Lowering Core
//!
//! Lowers an Objective-J syntax tree ([`objj_ir::Program`]) to plain
//! JavaScript calling the Objective-J runtime.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=objj_codegen=debug`: registrations and per-unit spans.
//! - `RUST_LOG=objj_codegen=trace`: also every message-send dispatch choice.
//!
//! Tracing output is only installed by [`init_tracing`].
//!
//! # Architecture
//!
//! - **Scopes** (`scope`): lexical frames, hoisting, ivar frames
//! - **Globals** (`globals`): pre-pass finding implicit globals
//! - **Environment** (`environment`): classes, protocols and typedefs known
//!   across compilation units
//! - **Model** (`model`, `accessors`): class/protocol tables and synthesized
//!   accessors
//! - **Precedence** (`precedence`): parenthesization decisions
//! - **Buffer** (`buffer`): text output, or nothing in import mode
//! - **Generator** (`generator`): the tree-walking driver
//!
//! # Example
//!
//! ```
//! use objj_codegen::{compile, CompileOptions, Environment};
//! use objj_ir::{build, Program};
//!
//! let program = Program::new(vec![build::var("x", Some(build::num("1")))]);
//! let mut env = Environment::new();
//! let output = compile(&program, &mut env, &CompileOptions::default()).unwrap();
//! assert_eq!(output.code.as_deref(), Some("var x = 1;\n"));
//! ```

pub mod accessors;
pub mod buffer;
pub mod environment;
mod error;
mod generator;
pub mod globals;
pub mod model;
mod options;
pub mod precedence;
pub mod scope;

pub use buffer::{Mark, NoopBuffer, OutputBuffer, StringBuffer};
pub use environment::{ClassDef, Environment, IvarDef, ProtocolDef};
pub use error::CompileError;
pub use generator::Generator;
pub use globals::ImplicitGlobal;
pub use options::{CompileOptions, EmitMode};

use objj_diagnostic::Diagnostic;
use objj_ir::Program;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// A file the unit imports with `@import`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dependency {
    pub path: String,
    /// `@import "path"` (true) as opposed to `@import <path>`.
    pub local: bool,
}

/// Result of lowering one compilation unit.
#[derive(Debug)]
pub struct CompileOutput {
    /// Generated code; `None` in import mode.
    pub code: Option<String>,
    pub dependencies: Vec<Dependency>,
    /// Globals created by assignment to undeclared names.
    pub globals: Vec<ImplicitGlobal>,
    pub warnings: Vec<Diagnostic>,
}

/// Lower `program`.
///
/// Declarations are registered in `env` as they are emitted, so later units
/// compiled against the same environment see them. In
/// [`EmitMode::Import`] nothing is generated and only `env` is updated.
///
/// # Errors
///
/// The first [`CompileError`] aborts the unit. Declarations registered
/// before the error stay in `env`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(statements = program.body.len(), mode = ?options.mode)
)]
pub fn compile(
    program: &Program,
    env: &mut Environment,
    options: &CompileOptions,
) -> Result<CompileOutput, CompileError> {
    match options.mode {
        EmitMode::Code => Generator::new(StringBuffer::new(), env, options).generate(program),
        EmitMode::Import => Generator::new(NoopBuffer, env, options).generate(program),
    }
}
