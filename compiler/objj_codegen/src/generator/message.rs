//! Message send lowering.
//!
//! A send becomes a call to an arity-specific dispatch function, or with
//! inline dispatch, a lookup in the receiver's responder table. A receiver
//! that may be `null` is tested first; a receiver that must be evaluated
//! more than once but cannot be repeated is cached in a `___rN` temporary.

use objj_ir::{Expr, ExprKind, MessageSend};

use super::Generator;
use crate::accessors::FORWARD_FALLBACK;
use crate::buffer::OutputBuffer;
use crate::precedence::{Position, Precedence};
use crate::scope::{DeclKind, ScopeId};
use crate::CompileError;

/// Highest arity with a dedicated entry point.
const MAX_FIXED_ARITY: usize = 3;

/// How a send's receiver is handled.
#[derive(Copy, Clone, Debug)]
struct SendPlan {
    /// Emit a `== null` test before dispatching.
    guard: bool,
    /// Cache the receiver in a temporary.
    temp: bool,
}

impl<B: OutputBuffer> Generator<'_, B> {
    fn send_plan(&self, send: &MessageSend, scope: ScopeId) -> SendPlan {
        let (non_null, repeatable) = self.receiver_traits(&send.receiver, scope);
        let evaluated_twice = !non_null || self.options.inline_msg_send;
        SendPlan {
            guard: !non_null,
            temp: evaluated_twice && !repeatable,
        }
    }

    /// `(non_null, repeatable)` for a receiver expression.
    fn receiver_traits(&self, receiver: &Expr, scope: ScopeId) -> (bool, bool) {
        match &receiver.kind {
            ExprKind::SelfExpr | ExprKind::This => (true, true),
            ExprKind::Ident(name) => match self.scopes.resolve(scope, name) {
                Some(DeclKind::RefParameter) => (false, false),
                None | Some(DeclKind::Global) if self.env.has_class(name) => (true, true),
                _ => (false, true),
            },
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Array(_)
            | ExprKind::Object(_)
            | ExprKind::Function(_)
            | ExprKind::New { .. }
            | ExprKind::Selector(_)
            | ExprKind::ProtocolLiteral(_) => (true, false),
            ExprKind::Null => (false, true),
            _ => (false, false),
        }
    }

    pub(super) fn send_precedence(&self, send: &MessageSend, scope: ScopeId) -> Precedence {
        if matches!(send.receiver.kind, ExprKind::Super) {
            return Precedence::MEMBER;
        }
        let plan = self.send_plan(send, scope);
        if plan.guard || plan.temp {
            Precedence::PRIMARY
        } else {
            Precedence::MEMBER
        }
    }

    pub(super) fn emit_message_send(
        &mut self,
        send: &MessageSend,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        if matches!(send.receiver.kind, ExprKind::Super) {
            return self.emit_super_send(send, scope);
        }
        let plan = self.send_plan(send, scope);
        let selector = send.selector();
        tracing::trace!(
            selector = %selector,
            guard = plan.guard,
            temp = plan.temp,
            inline = self.options.inline_msg_send,
            "lowering message send"
        );

        let temp = plan.temp.then(|| self.acquire_temp());
        let result = self.parenthesized(plan.guard || plan.temp, |gen| {
            if let Some(temp) = &temp {
                gen.buffer.concat_fmt(format_args!("{temp} = "));
                gen.emit_in(&send.receiver, scope, Position::ListItem)?;
                gen.buffer.concat_comma();
            }
            if plan.guard {
                gen.emit_receiver(&send.receiver, temp.as_deref(), scope, Position::MemberObject)?;
                gen.buffer.concat(" == null ? null : ");
            }
            gen.emit_dispatch(send, &selector, temp.as_deref(), scope)
        });
        if temp.is_some() {
            self.release_temp();
        }
        result
    }

    fn emit_receiver(
        &mut self,
        receiver: &Expr,
        temp: Option<&str>,
        scope: ScopeId,
        position: Position,
    ) -> Result<(), CompileError> {
        match temp {
            Some(temp) => {
                self.buffer.concat(temp);
                Ok(())
            }
            None => self.emit_in(receiver, scope, position),
        }
    }

    /// The call itself, without any null guard.
    fn emit_dispatch(
        &mut self,
        send: &MessageSend,
        selector: &str,
        temp: Option<&str>,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        if self.options.inline_msg_send {
            self.buffer.concat_left_paren();
            self.emit_receiver(&send.receiver, temp, scope, Position::MemberObject)?;
            self.buffer.concat(".isa.method_msgSend[");
            self.concat_quoted(selector);
            self.buffer
                .concat_fmt(format_args!("] || {FORWARD_FALLBACK})("));
        } else {
            self.buffer
                .concat_fmt(format_args!("{}(", dispatch_name("objj_msgSend", send.arity())));
        }
        self.emit_receiver(&send.receiver, temp, scope, Position::ListItem)?;
        self.emit_selector_and_arguments(send, selector, scope)
    }

    /// `objj_msgSendSuperN({ receiver: self, super_class: ... }, "sel", ...)`
    fn emit_super_send(&mut self, send: &MessageSend, scope: ScopeId) -> Result<(), CompileError> {
        let Some(method) = &self.method else {
            return Err(CompileError::InvalidSuper {
                span: send.receiver.span,
            });
        };
        let super_class = method.super_class.clone();
        let selector = send.selector();
        tracing::trace!(selector = %selector, kind = ?method.kind, "lowering super send");
        self.buffer.concat_fmt(format_args!(
            "{}({{ receiver: self, super_class: {super_class} }}",
            dispatch_name("objj_msgSendSuper", send.arity())
        ));
        self.emit_selector_and_arguments(send, &selector, scope)
    }

    /// `, "sel", a, b)`
    fn emit_selector_and_arguments(
        &mut self,
        send: &MessageSend,
        selector: &str,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        self.buffer.concat_comma();
        self.concat_quoted(selector);
        for argument in send.arguments() {
            self.buffer.concat_comma();
            self.emit_in(argument, scope, Position::ListItem)?;
        }
        self.buffer.concat_right_paren();
        Ok(())
    }
}

/// `objj_msgSend2`, or the variadic `objj_msgSend` past the fixed arities.
fn dispatch_name(base: &str, arity: usize) -> String {
    if arity <= MAX_FIXED_ARITY {
        format!("{base}{arity}")
    } else {
        base.to_string()
    }
}
