//! Function and method bodies.

use objj_ir::{Function, MethodDeclaration, Stmt};

use super::{Generator, MethodContext};
use crate::buffer::OutputBuffer;
use crate::scope::{hoisted_declarations, DeclKind, ScopeId, ScopeKind};
use crate::CompileError;

/// Implicit leading parameters of every method function.
const METHOD_RECEIVER: &str = "self";
const METHOD_SELECTOR: &str = "_cmd";

impl<B: OutputBuffer> Generator<'_, B> {
    /// `function name(a, b) { ... }`
    pub(super) fn emit_function(
        &mut self,
        function: &Function,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        self.buffer.concat("function");
        if let Some(name) = &function.name {
            self.buffer.concat_fmt(format_args!(" {}", name.name));
        }
        let params: Vec<&str> = function.params.iter().map(|p| p.name.name.as_str()).collect();
        self.buffer
            .concat_fmt(format_args!("({}) ", params.join(", ")));

        let inner = self.scopes.enter_scope(scope, ScopeKind::Function);
        if let Some(name) = &function.name {
            self.scopes
                .declare(inner, &name.name, DeclKind::Function, name.span)?;
        }
        for param in &function.params {
            let kind = if param.by_ref {
                DeclKind::RefParameter
            } else {
                DeclKind::Parameter
            };
            self.scopes
                .declare(inner, &param.name.name, kind, param.name.span)?;
        }
        self.emit_function_body(&function.body, inner)?;
        self.scopes.exit_scope(inner);
        Ok(())
    }

    /// `function $Foo__sel_(self, _cmd, a) { ... }` for a method.
    ///
    /// `parent` is the ivar scope for instance methods and the enclosing
    /// scope for class methods.
    pub(super) fn emit_method_function(
        &mut self,
        method: &MethodDeclaration,
        function_name: Option<&str>,
        context: MethodContext,
        parent: ScopeId,
    ) -> Result<(), CompileError> {
        self.buffer.concat("function");
        if let Some(name) = function_name {
            self.buffer.concat_fmt(format_args!(" {name}"));
        }
        let mut params = vec![METHOD_RECEIVER, METHOD_SELECTOR];
        params.extend(method.params().map(|p| p.name.name.as_str()));
        self.buffer
            .concat_fmt(format_args!("({}) ", params.join(", ")));

        let inner = self.scopes.enter_scope(parent, ScopeKind::Method);
        self.scopes
            .declare(inner, METHOD_RECEIVER, DeclKind::Parameter, method.span)?;
        self.scopes
            .declare(inner, METHOD_SELECTOR, DeclKind::Parameter, method.span)?;
        for param in method.params() {
            let kind = if param.is_ref() {
                DeclKind::RefParameter
            } else {
                DeclKind::Parameter
            };
            self.scopes
                .declare(inner, &param.name.name, kind, param.name.span)?;
        }

        let outer = self.method.replace(context);
        let body = method.body.as_deref().unwrap_or_default();
        let result = self.emit_function_body(body, inner);
        self.method = outer;
        result?;
        self.scopes.exit_scope(inner);
        Ok(())
    }

    /// Braced body with hoisted declarations and its own temporaries.
    ///
    /// Temporaries the body needs are declared on the first line:
    /// `{\n    var ___r1;\n    ...\n}`.
    fn emit_function_body(&mut self, body: &[Stmt], scope: ScopeId) -> Result<(), CompileError> {
        for (ident, kind) in hoisted_declarations(body) {
            self.scopes.declare(scope, &ident.name, kind, ident.span)?;
        }
        self.buffer.concat("{");
        self.buffer.indent();
        let (inner, temps) = self.emit_in_frame(|gen| gen.emit_block_statements(body, scope))?;
        if temps > 0 {
            self.buffer.concat_newline();
            self.concat_temp_declarations(temps);
        }
        self.buffer.concat_buffer(inner);
        self.buffer.dedent();
        self.buffer.concat_newline();
        self.buffer.concat("}");
        Ok(())
    }
}
