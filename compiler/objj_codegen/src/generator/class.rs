//! `@implementation` emission.

use objj_diagnostic::{Diagnostic, ErrorCode};
use objj_ir::{ClassDeclaration, IvarDeclaration, MethodDeclaration};
use rustc_hash::FxHashSet;

use super::{Generator, MethodContext};
use crate::buffer::OutputBuffer;
use crate::model::{method_comment, type_signature, ClassModel};
use crate::scope::{DeclKind, ScopeId, ScopeKind};
use crate::CompileError;

impl<B: OutputBuffer> Generator<'_, B> {
    /// Emit a class or category, retracting any partial text and
    /// registration on error.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %class.name.name))]
    pub(super) fn emit_class(
        &mut self,
        class: &ClassDeclaration,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        let mark = self.buffer.mark();
        // Registration happens before the method bodies so they can send to
        // the class itself; a failure puts the previous entry back.
        let saved = self.env.class(&class.name.name).cloned();
        let result = self.emit_class_unchecked(class, scope);
        if result.is_err() {
            self.buffer.remove(mark);
            self.env.restore_class(&class.name.name, saved);
        }
        result
    }

    fn emit_class_unchecked(
        &mut self,
        decl: &ClassDeclaration,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        let model = ClassModel::new(decl);
        self.check_class_references(decl)?;

        // Ivar frames: inherited ivars, then the class's own. A category
        // sees every ivar of the class it extends.
        let inherited = self.enter_ivar_frame(scope, &model)?;
        let own = if model.category().is_none() {
            let own = self.scopes.enter_scope(inherited, ScopeKind::Class);
            for ivar in &decl.ivars {
                self.scopes
                    .declare(own, &ivar.name.name, DeclKind::Ivar, ivar.name.span)?;
            }
            Some(own)
        } else {
            None
        };
        let ivar_scope = own.unwrap_or(inherited);

        self.register_class(&model);

        self.buffer.concat(&model.header_comment());
        self.buffer.concat_newline();
        self.emit_class_allocation(&model);
        if model.category().is_none() && !decl.ivars.is_empty() {
            self.buffer.concat_newline();
            self.emit_ivars(&decl.ivars);
        }

        let instance_methods: Vec<&MethodDeclaration> =
            model.instance_methods.iter().map(|method| &**method).collect();
        self.emit_method_table(&model, "the_class", &instance_methods, ivar_scope)?;
        if let Some(own) = own {
            self.scopes.exit_scope(own);
        }
        self.scopes.exit_scope(inherited);
        self.emit_method_table(&model, "meta_class", &model.class_methods, scope)?;

        for protocol in model.protocols() {
            self.buffer.concat_newline();
            self.emit_protocol_lookup(protocol);
            self.buffer.concat_newline();
            self.buffer.concat("class_addProtocol(the_class, aProtocol);");
        }
        self.buffer.concat_newline();
        self.buffer.concat("}");

        self.check_conformance(&model);
        Ok(())
    }

    /// Superclass, category target and adopted protocols must be known.
    fn check_class_references(&self, decl: &ClassDeclaration) -> Result<(), CompileError> {
        let required_class = if decl.is_category() {
            Some(&decl.name)
        } else {
            decl.superclass.as_ref()
        };
        if let Some(class) = required_class {
            if !self.env.has_class(&class.name) {
                return Err(CompileError::UndefinedClass {
                    name: class.name.clone(),
                    span: class.span,
                });
            }
        }
        if let Some(protocol) = decl
            .protocols
            .iter()
            .find(|p| !self.env.has_protocol(&p.name))
        {
            return Err(CompileError::UndefinedProtocol {
                name: protocol.name.clone(),
                span: protocol.span,
            });
        }
        Ok(())
    }

    /// Frame of ivars the class inherits, or for a category, every ivar of
    /// the extended class.
    fn enter_ivar_frame(
        &mut self,
        scope: ScopeId,
        model: &ClassModel<'_>,
    ) -> Result<ScopeId, CompileError> {
        let source = match model.category() {
            Some(_) => Some(model.name()),
            None => model.superclass(),
        };
        let mut seen = FxHashSet::default();
        let names: Vec<String> = source
            .map(|class| self.env.all_ivars(class))
            .unwrap_or_default()
            .into_iter()
            .filter(|ivar| seen.insert(ivar.name.as_str()))
            .map(|ivar| ivar.name.clone())
            .collect();
        let frame = self.scopes.enter_scope(scope, ScopeKind::Class);
        for name in names {
            self.scopes
                .declare(frame, &name, DeclKind::Ivar, model.decl.name.span)?;
        }
        Ok(frame)
    }

    fn register_class(&mut self, model: &ClassModel<'_>) {
        match model.category() {
            Some(category) => {
                tracing::debug!(class = model.name(), category, "extending class");
                self.env.extend_class(
                    model.name(),
                    model.instance_selectors(),
                    model.class_selectors(),
                    model.protocols(),
                );
            }
            None => self.env.declare_class(model.to_class_def()),
        }
    }

    fn emit_class_allocation(&mut self, model: &ClassModel<'_>) {
        if model.category().is_some() {
            let name = model.name();
            self.buffer
                .concat_fmt(format_args!("{{var the_class = objj_getClass(\"{name}\");"));
            self.buffer.concat_newline();
            self.buffer.concat_fmt(format_args!(
                "if (!the_class) throw new SyntaxError(\"*** Could not find definition for class \\\"{name}\\\"\");"
            ));
            self.buffer.concat_newline();
            self.buffer.concat("var meta_class = the_class.isa;");
            return;
        }
        let superclass = match model.superclass() {
            Some(superclass) => format!("objj_getClass(\"{superclass}\")"),
            None => "Nil".to_string(),
        };
        self.buffer.concat_fmt(format_args!(
            "{{var the_class = objj_allocateClassPair({superclass}, \"{}\"),",
            model.name()
        ));
        self.buffer.concat_newline();
        self.buffer.concat("meta_class = the_class.isa;");
        self.buffer.concat_newline();
        self.buffer.concat("objj_registerClassPair(the_class);");
    }

    /// `class_addIvars(the_class, [new objj_ivar("x", "int")]);`
    fn emit_ivars(&mut self, ivars: &[IvarDeclaration]) {
        self.buffer.concat("class_addIvars(the_class, [");
        for (i, ivar) in ivars.iter().enumerate() {
            if i > 0 {
                self.buffer.concat_comma();
            }
            self.buffer.concat("new objj_ivar(");
            self.concat_quoted(&ivar.name.name);
            if self.options.include_ivar_type_signatures {
                self.buffer.concat_comma();
                self.concat_quoted(&ivar.type_name);
            }
            self.buffer.concat(")");
        }
        self.buffer.concat("]);");
    }

    /// `class_addMethods(target, [ ... ]);`, omitted when empty.
    fn emit_method_table(
        &mut self,
        model: &ClassModel<'_>,
        target: &str,
        methods: &[&MethodDeclaration],
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        if methods.is_empty() {
            return Ok(());
        }
        self.buffer.concat_newline();
        self.buffer
            .concat_fmt(format_args!("class_addMethods({target}, ["));
        for (i, method) in methods.iter().enumerate() {
            if i > 0 {
                self.buffer.concat(",");
            }
            self.buffer.concat_newline();
            self.buffer.concat(&method_comment(method));
            self.buffer.concat_newline();
            self.emit_method(model, method, scope)?;
        }
        self.buffer.concat("]);");
        Ok(())
    }

    /// `new objj_method(sel_getUid("sel"), function ... { ... }, ["ret"])`
    fn emit_method(
        &mut self,
        model: &ClassModel<'_>,
        method: &MethodDeclaration,
        scope: ScopeId,
    ) -> Result<(), CompileError> {
        self.buffer.concat("new objj_method(sel_getUid(");
        self.concat_quoted(&method.selector());
        self.buffer.concat("), ");
        let function_name = self
            .options
            .include_method_function_names
            .then(|| model.function_name(method));
        let context = MethodContext {
            kind: method.kind,
            super_class: model.super_class_ref(method.kind),
        };
        self.emit_method_function(method, function_name.as_deref(), context, scope)?;
        if self.options.include_method_argument_type_signatures {
            self.buffer.concat_comma();
            self.buffer.concat(&type_signature(method));
        }
        self.buffer.concat(")");
        Ok(())
    }

    /// Warn for each required protocol method the class does not respond to.
    fn check_conformance(&mut self, model: &ClassModel<'_>) {
        for protocol in model.protocols() {
            for (kind, selector) in self.env.required_methods(protocol) {
                if self.env.responds_to(model.name(), kind, &selector) {
                    continue;
                }
                let sigil = kind.sigil();
                tracing::debug!(class = model.name(), protocol, %selector, "unimplemented protocol method");
                self.warnings.push(
                    Diagnostic::warning(ErrorCode::W5002)
                        .with_message(format!(
                            "method `{sigil}{selector}` in protocol `{protocol}` not implemented"
                        ))
                        .with_label(model.decl.name.span, "in this class")
                        .with_note(format!("`{protocol}` requires `{sigil}{selector}`")),
                );
            }
        }
    }
}
