//! Expression emission and parenthesization.
//!
//! Parentheses are decided from the precedence of the *emitted* form, which
//! differs from the source form for message sends, references and ivars.

use objj_ir::{Expr, ExprKind, MemberProperty, Property, PropertyKey, UnaryOp, UpdateOp};

use super::Generator;
use crate::buffer::OutputBuffer;
use crate::precedence::{host_precedence, needs_parens, Operand, Position, Precedence};
use crate::scope::{DeclKind, ScopeId};
use crate::CompileError;

impl<B: OutputBuffer> Generator<'_, B> {
    /// Precedence of the text `expr` lowers to.
    pub(super) fn precedence_of(&self, expr: &Expr, scope: ScopeId) -> Precedence {
        match &expr.kind {
            ExprKind::Ident(name) => match self.scopes.resolve(scope, name) {
                Some(DeclKind::Ivar | DeclKind::RefParameter) => Precedence::MEMBER,
                _ => Precedence::PRIMARY,
            },
            ExprKind::MessageSend(send) => self.send_precedence(send, scope),
            ExprKind::Ref(operand) if self.is_ref_param(operand, scope) => Precedence::PRIMARY,
            ExprKind::Assign { target, .. } if self.is_reference_target(target, scope) => {
                Precedence::MEMBER
            }
            ExprKind::Update {
                op,
                prefix,
                operand,
            } if self.is_reference_target(operand, scope) => {
                if *prefix {
                    Precedence::MEMBER
                } else {
                    Precedence::binary(op.undo())
                }
            }
            _ => host_precedence(expr),
        }
    }

    /// Whether the lowered `new` callee holds a call that would otherwise be
    /// taken as the constructor's argument list (`new (f())()`).
    ///
    /// Dereferences, reference parameters and writes through a reference
    /// all lower to accessor calls.
    fn callee_contains_call(&self, callee: &Expr, scope: ScopeId) -> bool {
        match &callee.kind {
            ExprKind::Call { .. } | ExprKind::MessageSend(_) | ExprKind::Deref(_) => true,
            ExprKind::Ident(_) => self.is_ref_param(callee, scope),
            ExprKind::Assign { target, .. } | ExprKind::Update { operand: target, .. } => {
                self.is_reference_target(target, scope)
            }
            ExprKind::Member { object, .. } => self.callee_contains_call(object, scope),
            _ => false,
        }
    }

    /// Emit `expr`, parenthesized if its lowered form needs it in `position`.
    pub(super) fn emit_in(
        &mut self,
        expr: &Expr,
        scope: ScopeId,
        position: Position,
    ) -> Result<(), CompileError> {
        let mut wrap = self.precedence_of(expr, scope).wraps_in(position);
        // `1.toString()` would read as a malformed number.
        if position == Position::MemberObject {
            wrap |= matches!(expr.kind, ExprKind::Number(_));
        }
        self.parenthesized(wrap, |gen| gen.emit_expr(expr, scope))
    }

    /// Emit one side of a binary or logical operator.
    pub(super) fn emit_operand(
        &mut self,
        parent: Precedence,
        expr: &Expr,
        scope: ScopeId,
        operand: Operand,
    ) -> Result<(), CompileError> {
        let wrap = needs_parens(parent, self.precedence_of(expr, scope), operand);
        self.parenthesized(wrap, |gen| gen.emit_expr(expr, scope))
    }

    /// Comma-separated list items.
    pub(super) fn emit_list<'e>(
        &mut self,
        items: impl IntoIterator<Item = &'e Expr>,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.buffer.concat_comma();
            }
            self.emit_in(item, scope, Position::ListItem)?;
        }
        Ok(())
    }

    pub(super) fn emit_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<(), CompileError> {
        match &expr.kind {
            ExprKind::Ident(name) => self.emit_ident(name, scope),
            ExprKind::Number(raw) => self.buffer.concat(raw),
            ExprKind::Str(text) => self.concat_quoted(text),
            ExprKind::Bool(value) => self.buffer.concat(if *value { "true" } else { "false" }),
            ExprKind::Null => self.buffer.concat("null"),
            ExprKind::This => self.buffer.concat("this"),
            ExprKind::SelfExpr => self.buffer.concat("self"),
            ExprKind::Super => return Err(CompileError::InvalidSuper { span: expr.span }),
            ExprKind::Array(elements) => self.emit_array(elements, scope)?,
            ExprKind::Object(properties) => self.emit_object(properties, scope)?,
            ExprKind::Function(function) => self.emit_function(function, scope)?,
            ExprKind::Unary { op, operand } => self.emit_unary(*op, operand, scope, expr)?,
            ExprKind::Update {
                op,
                prefix,
                operand,
            } => {
                if self.is_reference_target(operand, scope) {
                    self.emit_reference_update(*op, *prefix, operand, scope)?;
                } else if *prefix {
                    self.buffer.concat(op.as_symbol());
                    self.emit_in(operand, scope, Position::UnaryOperand)?;
                } else {
                    self.emit_in(operand, scope, Position::UnaryOperand)?;
                    self.buffer.concat(op.as_symbol());
                }
            }
            ExprKind::Binary { op, left, right } => {
                let parent = Precedence::binary(*op);
                self.emit_operand(parent, left, scope, Operand::Left)?;
                self.buffer.concat_operator(op.as_symbol());
                self.emit_operand(parent, right, scope, Operand::Right)?;
            }
            ExprKind::Logical { op, left, right } => {
                let parent = Precedence::logical(*op);
                self.emit_operand(parent, left, scope, Operand::Left)?;
                self.buffer.concat_operator(op.as_symbol());
                self.emit_operand(parent, right, scope, Operand::Right)?;
            }
            ExprKind::Assign { op, target, value } => {
                if self.is_reference_target(target, scope) {
                    self.emit_reference_assign(*op, target, value, scope)?;
                } else {
                    self.emit_in(target, scope, Position::UnaryOperand)?;
                    self.buffer.concat_operator(&op.as_symbol());
                    self.emit_in(value, scope, Position::ListItem)?;
                }
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.emit_in(test, scope, Position::Test)?;
                self.buffer.concat(" ? ");
                self.emit_in(consequent, scope, Position::Branch)?;
                self.buffer.concat(" : ");
                self.emit_in(alternate, scope, Position::Branch)?;
            }
            ExprKind::Call { callee, args } => {
                self.emit_in(callee, scope, Position::MemberObject)?;
                self.buffer.concat_left_paren();
                self.emit_list(args, scope)?;
                self.buffer.concat_right_paren();
            }
            ExprKind::New { callee, args } => {
                self.buffer.concat("new ");
                let wrap = self
                    .precedence_of(callee, scope)
                    .wraps_in(Position::MemberObject)
                    || self.callee_contains_call(callee, scope);
                self.parenthesized(wrap, |gen| gen.emit_expr(callee, scope))?;
                self.buffer.concat_left_paren();
                self.emit_list(args, scope)?;
                self.buffer.concat_right_paren();
            }
            ExprKind::Member { object, property } => {
                self.emit_in(object, scope, Position::MemberObject)?;
                match property {
                    MemberProperty::Named(name) => {
                        self.buffer.concat_fmt(format_args!(".{name}"));
                    }
                    MemberProperty::Computed(index) => {
                        self.buffer.concat("[");
                        self.emit_expr(index, scope)?;
                        self.buffer.concat("]");
                    }
                }
            }
            ExprKind::Sequence(exprs) => self.emit_list(exprs, scope)?,
            ExprKind::MessageSend(send) => self.emit_message_send(send, scope)?,
            ExprKind::Selector(selector) => {
                self.buffer.concat("sel_getUid(");
                self.concat_quoted(selector);
                self.buffer.concat(")");
            }
            ExprKind::ProtocolLiteral(name) => {
                self.buffer.concat("objj_getProtocol(");
                self.concat_quoted(name);
                self.buffer.concat(")");
            }
            ExprKind::Ref(operand) => self.emit_ref(operand, scope)?,
            ExprKind::Deref(operand) => self.emit_deref_read(operand, scope)?,
        }
        Ok(())
    }

    /// Identifiers resolving to an ivar read through `self`; reference
    /// parameters read through their accessor.
    fn emit_ident(&mut self, name: &str, scope: ScopeId) {
        match self.scopes.resolve(scope, name) {
            Some(DeclKind::Ivar) => self.buffer.concat_fmt(format_args!("self.{name}")),
            Some(DeclKind::RefParameter) => self.buffer.concat_fmt(format_args!("{name}()")),
            _ => self.buffer.concat(name),
        }
    }

    fn emit_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        scope: ScopeId,
        expr: &Expr,
    ) -> Result<(), CompileError> {
        if op == UnaryOp::Delete && self.is_reference_target(operand, scope) {
            return Err(CompileError::UnsupportedReferenceUsage {
                reason: "a dereference cannot be deleted",
                span: expr.span,
            });
        }
        self.buffer.concat(op.as_symbol());
        if op.is_keyword() || sign_would_merge(op, operand) {
            self.buffer.concat(" ");
        }
        self.emit_in(operand, scope, Position::UnaryOperand)
    }

    /// `[1, , 3]`; a trailing hole needs an extra comma to survive.
    fn emit_array(&mut self, elements: &[Option<Expr>], scope: ScopeId) -> Result<(), CompileError> {
        self.buffer.concat("[");
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.buffer.concat(",");
                if element.is_some() {
                    self.buffer.concat(" ");
                }
            }
            if let Some(element) = element {
                self.emit_in(element, scope, Position::ListItem)?;
            }
        }
        if matches!(elements.last(), Some(None)) {
            self.buffer.concat(",");
        }
        self.buffer.concat("]");
        Ok(())
    }

    fn emit_object(&mut self, properties: &[Property], scope: ScopeId) -> Result<(), CompileError> {
        if properties.is_empty() {
            self.buffer.concat("{}");
            return Ok(());
        }
        self.buffer.concat("{ ");
        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                self.buffer.concat_comma();
            }
            match &property.key {
                PropertyKey::Ident(name) | PropertyKey::Number(name) => self.buffer.concat(name),
                PropertyKey::Str(text) => self.concat_quoted(text),
            }
            self.buffer.concat(": ");
            self.emit_in(&property.value, scope, Position::ListItem)?;
        }
        self.buffer.concat(" }");
        Ok(())
    }
}

/// `- -x` and `+ +x` must not print as `--x` / `++x`.
fn sign_would_merge(op: UnaryOp, operand: &Expr) -> bool {
    let (sign, update) = match op {
        UnaryOp::Neg => ('-', UpdateOp::Decrement),
        UnaryOp::Plus => ('+', UpdateOp::Increment),
        _ => return false,
    };
    match &operand.kind {
        ExprKind::Unary { op: inner, .. } => *inner == op,
        ExprKind::Update {
            op: inner,
            prefix: true,
            ..
        } => *inner == update,
        ExprKind::Number(raw) => raw.starts_with(sign),
        _ => false,
    }
}
