//! Global Usage Collector
//!
//! A visitor pass run before code generation. It mirrors the generator's
//! scope chains (function scopes, method scopes, ivar frames) and records
//! every assignment whose target is a simple identifier that no scope
//! declares: an implicit global.
//!
//! Root-level implicit globals are recorded silently. One created inside a
//! function or method also yields a warning. Either way the name is
//! declared as a global in the root scope, so later assignments to it are
//! not reported again.

use objj_diagnostic::{Diagnostic, ErrorCode};
use objj_ir::visitor::{self, Visitor};
use objj_ir::{
    ClassDeclaration, Expr, ExprKind, Function, MethodDeclaration, MethodKind, Program, Span,
    Stmt, StmtKind,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::environment::Environment;
use crate::scope::{hoisted_declarations, DeclKind, ScopeId, ScopeKind, ScopeTree};

/// A global variable created by assignment to an undeclared name.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImplicitGlobal {
    pub name: String,
    pub span: Span,
    /// Created at the compilation-unit top level.
    pub in_root: bool,
}

/// Result of the collection pass.
#[derive(Debug, Default)]
pub struct CollectedGlobals {
    pub implicit: Vec<ImplicitGlobal>,
    /// Names declared with `@global`.
    pub declared: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

/// Collect implicit globals in `program`.
///
/// `env` supplies ivars of superclasses declared outside the unit.
pub fn collect(program: &Program, env: &Environment) -> CollectedGlobals {
    let mut collector = GlobalCollector {
        env,
        scopes: ScopeTree::new(),
        current: ScopeTree::ROOT,
        local_classes: FxHashMap::default(),
        out: CollectedGlobals::default(),
    };
    collector.declare_hoisted(ScopeTree::ROOT, &program.body);
    collector.visit_program(program);
    collector.out
}

/// Ivar layout of a class declared earlier in the unit.
struct LocalClass {
    superclass: Option<String>,
    ivars: Vec<String>,
}

struct GlobalCollector<'env> {
    env: &'env Environment,
    scopes: ScopeTree,
    current: ScopeId,
    local_classes: FxHashMap<String, LocalClass>,
    out: CollectedGlobals,
}

impl GlobalCollector<'_> {
    fn declare(&mut self, scope: ScopeId, name: &str, kind: DeclKind) {
        // Only ivar frames can reject a declaration, and duplicates there
        // are reported by the generator.
        let _ = self.scopes.declare(scope, name, kind, Span::DUMMY);
    }

    fn declare_hoisted(&mut self, scope: ScopeId, body: &[Stmt]) {
        for (ident, kind) in hoisted_declarations(body) {
            self.declare(scope, &ident.name, kind);
        }
    }

    /// Ivars of `class` and its superclasses, looking at classes declared
    /// earlier in the unit before the environment.
    fn ivars_of(&self, class: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(class);
        while let Some(name) = current {
            if !seen.insert(name) {
                break;
            }
            match self.local_classes.get(name) {
                Some(local) => {
                    out.extend(local.ivars.iter().cloned());
                    current = local.superclass.as_deref();
                }
                None => {
                    out.extend(self.env.all_ivars(name).iter().map(|i| i.name.clone()));
                    current = None;
                }
            }
        }
        out
    }

    fn with_scope(&mut self, kind: ScopeKind, f: impl FnOnce(&mut Self)) {
        let outer = self.current;
        self.current = self.scopes.enter_scope(outer, kind);
        f(self);
        self.scopes.exit_scope(self.current);
        self.current = outer;
    }

    fn record(&mut self, name: &str, span: Span) {
        let in_root = self.scopes.is_root(self.current);
        if !in_root {
            self.out.warnings.push(
                Diagnostic::warning(ErrorCode::W5001)
                    .with_message("Creating global variable inside function or method")
                    .with_label(span, format!("`{name}` is not declared"))
                    .with_note(format!("declare it with `var {name}` to keep it local")),
            );
        }
        tracing::debug!(name, in_root, "implicit global");
        self.out.implicit.push(ImplicitGlobal {
            name: name.to_string(),
            span,
            in_root,
        });
        self.declare(ScopeTree::ROOT, name, DeclKind::Global);
    }
}

impl<'ast> Visitor<'ast> for GlobalCollector<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match &stmt.kind {
            StmtKind::Global(names) => {
                for name in names {
                    self.declare(ScopeTree::ROOT, &name.name, DeclKind::Global);
                    self.out.declared.push(name.name.clone());
                }
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                visitor::walk_stmts(self, block);
                if let Some(handler) = handler {
                    self.with_scope(ScopeKind::Catch, |this| {
                        let scope = this.current;
                        this.declare(scope, &handler.param.name, DeclKind::Var);
                        visitor::walk_stmts(this, &handler.body);
                    });
                }
                if let Some(finalizer) = finalizer {
                    visitor::walk_stmts(self, finalizer);
                }
            }
            _ => visitor::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let ExprKind::Assign { target, .. } = &expr.kind {
            if let ExprKind::Ident(name) = &target.kind {
                if self.scopes.lookup(self.current, name).is_none() {
                    self.record(name, target.span);
                }
            }
        }
        visitor::walk_expr(self, expr);
    }

    fn visit_function(&mut self, function: &'ast Function) {
        self.with_scope(ScopeKind::Function, |this| {
            let scope = this.current;
            if let Some(name) = &function.name {
                this.declare(scope, &name.name, DeclKind::Function);
            }
            for param in &function.params {
                let kind = if param.by_ref {
                    DeclKind::RefParameter
                } else {
                    DeclKind::Parameter
                };
                this.declare(scope, &param.name.name, kind);
            }
            this.declare_hoisted(scope, &function.body);
            visitor::walk_function(this, function);
        });
    }

    fn visit_class(&mut self, class: &'ast ClassDeclaration) {
        let mut ivars = match (&class.category, &class.superclass) {
            (Some(_), _) => self.ivars_of(&class.name.name),
            (None, Some(superclass)) => self.ivars_of(&superclass.name),
            (None, None) => Vec::new(),
        };
        if class.category.is_none() {
            let own: Vec<String> = class.ivars.iter().map(|i| i.name.name.clone()).collect();
            self.local_classes.insert(
                class.name.name.clone(),
                LocalClass {
                    superclass: class.superclass.as_ref().map(|s| s.name.clone()),
                    ivars: own.clone(),
                },
            );
            ivars.extend(own);
        }

        self.with_scope(ScopeKind::Class, |this| {
            let ivar_scope = this.current;
            for ivar in &ivars {
                this.declare(ivar_scope, ivar, DeclKind::Ivar);
            }
            for method in class.methods.iter().filter(|m| m.kind == MethodKind::Instance) {
                this.visit_method(method);
            }
        });

        // Class methods do not see ivars.
        for method in class.methods.iter().filter(|m| m.kind == MethodKind::Class) {
            self.visit_method(method);
        }
    }

    fn visit_method(&mut self, method: &'ast MethodDeclaration) {
        let Some(body) = &method.body else {
            return;
        };
        self.with_scope(ScopeKind::Method, |this| {
            let scope = this.current;
            this.declare(scope, "self", DeclKind::Parameter);
            this.declare(scope, "_cmd", DeclKind::Parameter);
            for param in method.params() {
                let kind = if param.is_ref() {
                    DeclKind::RefParameter
                } else {
                    DeclKind::Parameter
                };
                this.declare(scope, &param.name.name, kind);
            }
            this.declare_hoisted(scope, body);
            visitor::walk_stmts(this, body);
        });
    }
}

#[cfg(test)]
mod tests;
