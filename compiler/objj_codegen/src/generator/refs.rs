//! Reference lowering.
//!
//! A reference is a one-argument accessor function: called with no
//! arguments it reads, called with one it writes. `@ref(x)` builds the
//! accessor; `@deref(r)` and reference parameters call it.

use objj_ir::{AssignOp, Expr, ExprKind, MemberProperty, UpdateOp};

use super::Generator;
use crate::buffer::OutputBuffer;
use crate::precedence::{Operand, Position, Precedence};
use crate::scope::{DeclKind, ScopeId};
use crate::CompileError;

impl<B: OutputBuffer> Generator<'_, B> {
    /// Whether `expr` is an identifier bound to a reference parameter.
    pub(super) fn is_ref_param(&self, expr: &Expr, scope: ScopeId) -> bool {
        expr.as_ident()
            .is_some_and(|name| self.scopes.resolve(scope, name) == Some(DeclKind::RefParameter))
    }

    /// Whether reads and writes of `expr` go through an accessor call.
    pub(super) fn is_reference_target(&self, expr: &Expr, scope: ScopeId) -> bool {
        matches!(expr.kind, ExprKind::Deref(_)) || self.is_ref_param(expr, scope)
    }

    /// `@ref(lvalue)`
    pub(super) fn emit_ref(&mut self, operand: &Expr, scope: ScopeId) -> Result<(), CompileError> {
        if self.is_ref_param(operand, scope) {
            self.buffer.concat(&ref_param_name(operand));
            return Ok(());
        }
        if !matches!(operand.kind, ExprKind::Ident(_) | ExprKind::Member { .. }) {
            return Err(CompileError::UnsupportedReferenceUsage {
                reason: "only a variable or property can be referenced",
                span: operand.span,
            });
        }
        self.buffer
            .concat("function(__input) { if (arguments.length) return ");
        self.emit_in(operand, scope, Position::UnaryOperand)?;
        self.buffer.concat(" = __input; return ");
        self.emit_in(operand, scope, Position::UnaryOperand)?;
        self.buffer.concat("; }");
        Ok(())
    }

    /// `@deref(r)` → `r()`
    pub(super) fn emit_deref_read(
        &mut self,
        operand: &Expr,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        self.emit_accessor_of(operand, scope)?;
        self.buffer.concat("()");
        Ok(())
    }

    /// `r(v)` or, for compound operators, `r(r() op v)`.
    pub(super) fn emit_reference_assign(
        &mut self,
        op: AssignOp,
        target: &Expr,
        value: &Expr,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        match op {
            AssignOp::Assign => {
                self.emit_accessor(target, scope)?;
                self.buffer.concat_left_paren();
                self.emit_in(value, scope, Position::ListItem)?;
                self.buffer.concat_right_paren();
            }
            AssignOp::Compound(bin) => {
                self.check_repeatable(target)?;
                self.emit_accessor(target, scope)?;
                self.buffer.concat_left_paren();
                self.emit_accessor(target, scope)?;
                self.buffer.concat("()");
                self.buffer.concat_operator(bin.as_symbol());
                self.emit_operand(Precedence::binary(bin), value, scope, Operand::Right)?;
                self.buffer.concat_right_paren();
            }
        }
        Ok(())
    }

    /// `++r` → `r(r() + 1)`; `r++` → `r(r() + 1) - 1`.
    pub(super) fn emit_reference_update(
        &mut self,
        op: UpdateOp,
        prefix: bool,
        target: &Expr,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        self.check_repeatable(target)?;
        self.emit_accessor(target, scope)?;
        self.buffer.concat_left_paren();
        self.emit_accessor(target, scope)?;
        self.buffer.concat("()");
        self.buffer.concat_operator(op.step().as_symbol());
        self.buffer.concat("1");
        self.buffer.concat_right_paren();
        if !prefix {
            self.buffer.concat_operator(op.undo().as_symbol());
            self.buffer.concat("1");
        }
        Ok(())
    }

    /// The accessor function behind a reference target.
    fn emit_accessor(&mut self, target: &Expr, scope: ScopeId) -> Result<(), CompileError> {
        match &target.kind {
            ExprKind::Deref(operand) => self.emit_accessor_of(operand, scope),
            _ => {
                self.buffer.concat(&ref_param_name(target));
                Ok(())
            }
        }
    }

    /// The accessor a `@deref` operand evaluates to. A reference
    /// parameter names its accessor directly.
    fn emit_accessor_of(&mut self, operand: &Expr, scope: ScopeId) -> Result<(), CompileError> {
        if self.is_ref_param(operand, scope) {
            self.buffer.concat(&ref_param_name(operand));
            Ok(())
        } else {
            self.emit_in(operand, scope, Position::MemberObject)
        }
    }

    /// Read-modify-write lowering evaluates the accessor twice.
    fn check_repeatable(&self, target: &Expr) -> Result<(), CompileError> {
        match &target.kind {
            ExprKind::Deref(operand) if !is_side_effect_free(operand) => {
                Err(CompileError::UnsupportedReferenceUsage {
                    reason: "a dereference whose operand has side effects cannot be updated in place",
                    span: target.span,
                })
            }
            _ => Ok(()),
        }
    }
}

fn ref_param_name(expr: &Expr) -> String {
    expr.as_ident().unwrap_or_default().to_string()
}

/// Whether evaluating `expr` twice is indistinguishable from once.
fn is_side_effect_free(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_)
        | ExprKind::Number(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::This
        | ExprKind::SelfExpr => true,
        ExprKind::Member { object, property } => {
            is_side_effect_free(object)
                && match property {
                    MemberProperty::Named(_) => true,
                    MemberProperty::Computed(index) => is_side_effect_free(index),
                }
        }
        _ => false,
    }
}
