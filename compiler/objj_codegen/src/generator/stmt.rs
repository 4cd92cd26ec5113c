//! Statement emission.

use objj_ir::{
    Expr, ExprKind, ForInTarget, ForInit, ImportDeclaration, Stmt, StmtKind, SwitchCase,
    VarDeclarator,
};

use super::Generator;
use crate::buffer::OutputBuffer;
use crate::precedence::Position;
use crate::scope::{DeclKind, ScopeId, ScopeKind, ScopeTree};
use crate::{CompileError, Dependency};

/// Declaration-only statements that produce no text.
fn is_silent(stmt: &Stmt) -> bool {
    matches!(
        stmt.kind,
        StmtKind::ClassForward(_) | StmtKind::ProtocolForward(_) | StmtKind::Global(_)
    )
}

impl<B: OutputBuffer> Generator<'_, B> {
    /// Program body: each statement followed by a newline.
    pub(super) fn emit_top_level_statements(
        &mut self,
        stmts: &[Stmt],
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        for stmt in stmts {
            self.emit_stmt(stmt, scope)?;
            if !is_silent(stmt) {
                self.buffer.concat_newline();
            }
        }
        Ok(())
    }

    /// Block body: each statement on a fresh line at the current indent.
    pub(super) fn emit_block_statements(
        &mut self,
        stmts: &[Stmt],
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        for stmt in stmts {
            if !is_silent(stmt) {
                self.buffer.concat_newline();
            }
            self.emit_stmt(stmt, scope)?;
        }
        Ok(())
    }

    pub(super) fn emit_stmt(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<(), CompileError> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let wrap = self.starts_statement_ambiguously(expr, scope);
                self.parenthesized(wrap, |gen| gen.emit_expr(expr, scope))?;
                self.buffer.concat(";");
            }
            StmtKind::Var(declarators) => {
                self.emit_var_declarators(declarators, scope)?;
                self.buffer.concat(";");
            }
            StmtKind::Return(value) => {
                self.buffer.concat("return");
                if let Some(value) = value {
                    self.buffer.concat(" ");
                    self.emit_expr(value, scope)?;
                }
                self.buffer.concat(";");
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.buffer.concat("if (");
                self.emit_expr(test, scope)?;
                self.buffer.concat(")");
                self.emit_substatement(consequent, scope)?;
                if let Some(alternate) = alternate {
                    if matches!(consequent.kind, StmtKind::Block(_)) {
                        self.buffer.concat(" ");
                    } else {
                        self.buffer.concat_newline();
                    }
                    self.buffer.concat("else");
                    if matches!(alternate.kind, StmtKind::If { .. }) {
                        self.buffer.concat(" ");
                        self.emit_stmt(alternate, scope)?;
                    } else {
                        self.emit_substatement(alternate, scope)?;
                    }
                }
            }
            StmtKind::While { test, body } => {
                self.buffer.concat("while (");
                self.emit_expr(test, scope)?;
                self.buffer.concat(")");
                self.emit_substatement(body, scope)?;
            }
            StmtKind::DoWhile { body, test } => {
                self.buffer.concat("do");
                self.emit_substatement(body, scope)?;
                if matches!(body.kind, StmtKind::Block(_)) {
                    self.buffer.concat(" ");
                } else {
                    self.buffer.concat_newline();
                }
                self.buffer.concat("while (");
                self.emit_expr(test, scope)?;
                self.buffer.concat(");");
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.buffer.concat("for (");
                match init {
                    Some(ForInit::Var(declarators)) => {
                        self.emit_var_declarators(declarators, scope)?;
                    }
                    Some(ForInit::Expr(expr)) => self.emit_expr(expr, scope)?,
                    None => {}
                }
                self.buffer.concat(";");
                if let Some(test) = test {
                    self.buffer.concat(" ");
                    self.emit_expr(test, scope)?;
                }
                self.buffer.concat(";");
                if let Some(update) = update {
                    self.buffer.concat(" ");
                    self.emit_expr(update, scope)?;
                }
                self.buffer.concat(")");
                self.emit_substatement(body, scope)?;
            }
            StmtKind::ForIn {
                target,
                object,
                body,
            } => {
                self.buffer.concat("for (");
                match target {
                    ForInTarget::Var(name) => {
                        self.buffer.concat_fmt(format_args!("var {}", name.name));
                    }
                    ForInTarget::Expr(expr) => {
                        if self.is_reference_target(expr, scope) {
                            return Err(CompileError::UnsupportedReferenceUsage {
                                reason: "a reference cannot be the target of a for-in loop",
                                span: expr.span,
                            });
                        }
                        self.emit_in(expr, scope, Position::UnaryOperand)?;
                    }
                }
                self.buffer.concat(" in ");
                self.emit_expr(object, scope)?;
                self.buffer.concat(")");
                self.emit_substatement(body, scope)?;
            }
            StmtKind::Block(stmts) => self.emit_block(stmts, scope)?,
            StmtKind::Function(function) => self.emit_function(function, scope)?,
            StmtKind::Break(label) => self.emit_jump("break", label.as_ref().map(|l| &l.name)),
            StmtKind::Continue(label) => {
                self.emit_jump("continue", label.as_ref().map(|l| &l.name));
            }
            StmtKind::Throw(value) => {
                self.buffer.concat("throw ");
                self.emit_expr(value, scope)?;
                self.buffer.concat(";");
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.buffer.concat("try ");
                self.emit_block(block, scope)?;
                if let Some(handler) = handler {
                    self.buffer
                        .concat_fmt(format_args!(" catch ({}) ", handler.param.name));
                    let catch_scope = self.scopes.enter_scope(scope, ScopeKind::Catch);
                    self.scopes.declare(
                        catch_scope,
                        &handler.param.name,
                        DeclKind::Var,
                        handler.param.span,
                    )?;
                    self.emit_block(&handler.body, catch_scope)?;
                    self.scopes.exit_scope(catch_scope);
                }
                if let Some(finalizer) = finalizer {
                    self.buffer.concat(" finally ");
                    self.emit_block(finalizer, scope)?;
                }
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                self.buffer.concat("switch (");
                self.emit_expr(discriminant, scope)?;
                self.buffer.concat(") {");
                for case in cases {
                    self.emit_switch_case(case, scope)?;
                }
                self.buffer.concat_newline();
                self.buffer.concat("}");
            }
            StmtKind::Empty => self.buffer.concat(";"),
            StmtKind::Class(class) => self.emit_class(class, scope)?,
            StmtKind::Protocol(protocol) => self.emit_protocol(protocol)?,
            StmtKind::Typedef(typedef) => self.emit_typedef(typedef),
            StmtKind::Import(import) => self.emit_import(import),
            StmtKind::ClassForward(names) => {
                for name in names {
                    self.env.forward_class(&name.name);
                }
            }
            StmtKind::ProtocolForward(names) => {
                for name in names {
                    self.env.forward_protocol(&name.name);
                }
            }
            StmtKind::Global(names) => {
                for name in names {
                    self.scopes
                        .declare(ScopeTree::ROOT, &name.name, DeclKind::Global, name.span)?;
                }
            }
        }
        Ok(())
    }

    /// Whether the lowered statement would start with `{` or `function`
    /// and be misread as a block or declaration. `@ref(x)` lowers to a
    /// function expression.
    fn starts_statement_ambiguously(&self, expr: &Expr, scope: ScopeId) -> bool {
        match &expr.kind {
            ExprKind::Object(_) | ExprKind::Function(_) => true,
            ExprKind::Ref(operand) => !self.is_ref_param(operand, scope),
            ExprKind::Deref(inner)
            | ExprKind::Member { object: inner, .. }
            | ExprKind::Call { callee: inner, .. } => self.leads_statement(inner, scope),
            ExprKind::Binary { left, .. } | ExprKind::Logical { left, .. } => {
                self.starts_statement_ambiguously(left, scope)
            }
            ExprKind::Assign { target, .. } => self.starts_statement_ambiguously(target, scope),
            ExprKind::Conditional { test, .. } => self.starts_statement_ambiguously(test, scope),
            // A reference update starts with its accessor even when prefixed.
            ExprKind::Update {
                prefix, operand, ..
            } => {
                (!*prefix || self.is_reference_target(operand, scope))
                    && self.starts_statement_ambiguously(operand, scope)
            }
            ExprKind::Sequence(exprs) => exprs
                .first()
                .is_some_and(|first| self.starts_statement_ambiguously(first, scope)),
            _ => false,
        }
    }

    /// A member object or callee that gets its own parentheses cannot
    /// start the statement.
    fn leads_statement(&self, inner: &Expr, scope: ScopeId) -> bool {
        !self
            .precedence_of(inner, scope)
            .wraps_in(Position::MemberObject)
            && self.starts_statement_ambiguously(inner, scope)
    }

    /// `{ ... }` with one statement per line. An empty block is `{}`.
    pub(super) fn emit_block(&mut self, stmts: &[Stmt], scope: ScopeId) -> Result<(), CompileError> {
        if stmts.is_empty() {
            self.buffer.concat("{}");
            return Ok(());
        }
        self.buffer.concat("{");
        self.buffer.indent();
        self.emit_block_statements(stmts, scope)?;
        self.buffer.dedent();
        self.buffer.concat_newline();
        self.buffer.concat("}");
        Ok(())
    }

    /// Body of `if`/`while`/`for`: a block stays on the header line, any
    /// other statement goes on its own indented line.
    fn emit_substatement(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<(), CompileError> {
        if matches!(stmt.kind, StmtKind::Block(_)) {
            self.buffer.concat(" ");
            return self.emit_stmt(stmt, scope);
        }
        self.buffer.indent();
        self.buffer.concat_newline();
        self.emit_stmt(stmt, scope)?;
        self.buffer.dedent();
        Ok(())
    }

    /// `var a = 1, b` without the trailing semicolon.
    fn emit_var_declarators(
        &mut self,
        declarators: &[VarDeclarator],
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        self.buffer.concat("var ");
        for (i, declarator) in declarators.iter().enumerate() {
            if i > 0 {
                self.buffer.concat_comma();
            }
            self.buffer.concat(&declarator.name.name);
            if let Some(init) = &declarator.init {
                self.buffer.concat_operator("=");
                self.emit_in(init, scope, Position::ListItem)?;
            }
        }
        Ok(())
    }

    fn emit_jump(&mut self, keyword: &str, label: Option<&String>) {
        self.buffer.concat(keyword);
        if let Some(label) = label {
            self.buffer.concat_fmt(format_args!(" {label}"));
        }
        self.buffer.concat(";");
    }

    fn emit_switch_case(&mut self, case: &SwitchCase, scope: ScopeId) -> Result<(), CompileError> {
        self.buffer.concat_newline();
        match &case.test {
            Some(test) => {
                self.buffer.concat("case ");
                self.emit_expr(test, scope)?;
                self.buffer.concat(":");
            }
            None => self.buffer.concat("default:"),
        }
        self.buffer.indent();
        self.emit_block_statements(&case.body, scope)?;
        self.buffer.dedent();
        Ok(())
    }

    /// `objj_executeFile("path", local);`, recording the dependency.
    fn emit_import(&mut self, import: &ImportDeclaration) {
        tracing::debug!(path = %import.path, local = import.local, "import");
        self.buffer.concat("objj_executeFile(");
        self.concat_quoted(&import.path);
        self.buffer
            .concat_fmt(format_args!(", {});", if import.local { "true" } else { "false" }));
        self.dependencies.push(Dependency {
            path: import.path.clone(),
            local: import.local,
        });
    }
}
