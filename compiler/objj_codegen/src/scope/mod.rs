//! Scope Manager
//!
//! Lexical scope chain for name resolution during lowering.
//!
//! Frames live in an arena owned by [`ScopeTree`] and are addressed by
//! [`ScopeId`]. The id of the scope in effect is threaded explicitly
//! through every emission call; there is no ambient "current scope".
//! Frames still follow stack discipline: [`ScopeTree::exit_scope`] pops
//! the innermost frame.
//!
//! # Method scope chains
//!
//! ```text
//! root
//!  └─ inherited ivars (Class)
//!      └─ own ivars (Class)
//!          └─ method: self, _cmd, parameters, hoisted vars (Method)
//! ```
//!
//! Class methods hang directly off the root, so ivars never resolve there.

mod hoist;

use objj_ir::Span;
use rustc_hash::FxHashMap;

use crate::CompileError;

pub use hoist::hoisted_declarations;

/// Index of a frame in the [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What introduced a frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    /// Compilation-unit top level.
    Root,
    /// Instance variables visible to instance methods.
    Class,
    Method,
    Function,
    /// Binding of a `catch` parameter.
    Catch,
}

/// How a name was declared.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Var,
    Function,
    Parameter,
    /// Parameter holding a reference accessor; reads and writes lower to
    /// accessor calls.
    RefParameter,
    Ivar,
    /// Explicit `@global` or implicit global created by assignment.
    Global,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    names: FxHashMap<String, DeclKind>,
}

/// Arena of scope frames.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// The compilation-unit root scope.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Create a tree holding only the root scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope {
                kind: ScopeKind::Root,
                parent: None,
                names: FxHashMap::default(),
            }],
        }
    }

    /// Push a child frame of `parent`.
    pub fn enter_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        debug_assert_eq!(
            parent.index() + 1,
            self.scopes.len(),
            "scopes must be entered from the innermost frame"
        );
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            names: FxHashMap::default(),
        });
        id
    }

    /// Pop `scope`, which must be the innermost frame. Returns its parent.
    ///
    /// The root is never popped.
    pub fn exit_scope(&mut self, scope: ScopeId) -> ScopeId {
        debug_assert_eq!(
            scope.index() + 1,
            self.scopes.len(),
            "scopes must be exited innermost first"
        );
        let parent = self.scopes[scope.index()].parent;
        match parent {
            Some(parent) => {
                self.scopes.truncate(scope.index());
                parent
            }
            None => Self::ROOT,
        }
    }

    /// Register `name` in `scope`.
    ///
    /// Shadowing an outer declaration is always allowed and re-declaring a
    /// plain binding in the same frame keeps the first kind. Only a
    /// duplicate ivar within one class frame is rejected.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: DeclKind,
        span: Span,
    ) -> Result<(), CompileError> {
        let names = &mut self.scopes[scope.index()].names;
        match names.get(name) {
            Some(DeclKind::Ivar) if kind == DeclKind::Ivar => Err(CompileError::Redeclaration {
                name: name.to_string(),
                span,
            }),
            Some(_) => Ok(()),
            None => {
                names.insert(name.to_string(), kind);
                Ok(())
            }
        }
    }

    /// Nearest declaration of `name`, walking outward from `scope`.
    ///
    /// `None` means unresolved: no frame up to and including the root
    /// declares it.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, DeclKind)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = &self.scopes[id.index()];
            if let Some(kind) = frame.names.get(name) {
                return Some((id, *kind));
            }
            current = frame.parent;
        }
        None
    }

    /// Declaration kind of the nearest declaration of `name`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<DeclKind> {
        self.lookup(scope, name).map(|(_, kind)| kind)
    }

    pub fn is_root(&self, scope: ScopeId) -> bool {
        self.scopes[scope.index()].kind == ScopeKind::Root
    }
}
