//! `@protocol` emission.

use objj_ir::{MethodKind, ProtocolDeclaration};

use super::Generator;
use crate::buffer::OutputBuffer;
use crate::model::{method_comment, type_signature, DescriptionTable, ProtocolModel};
use crate::CompileError;

impl<B: OutputBuffer> Generator<'_, B> {
    #[tracing::instrument(level = "debug", skip_all, fields(protocol = %protocol.name.name))]
    pub(super) fn emit_protocol(&mut self, protocol: &ProtocolDeclaration) -> Result<(), CompileError> {
        if let Some(missing) = protocol
            .inherited
            .iter()
            .find(|p| !self.env.has_protocol(&p.name))
        {
            return Err(CompileError::UndefinedProtocol {
                name: missing.name.clone(),
                span: missing.span,
            });
        }

        let model = ProtocolModel::new(protocol);
        self.buffer.concat(&model.header_comment());
        self.buffer.concat_newline();
        self.buffer.concat("{var the_protocol = objj_allocateProtocol(");
        self.concat_quoted(model.name());
        self.buffer.concat(");");
        for inherited in &protocol.inherited {
            self.buffer.concat_newline();
            self.emit_protocol_lookup(&inherited.name);
            self.buffer.concat_newline();
            self.buffer
                .concat("protocol_addProtocol(the_protocol, aProtocol);");
        }
        self.buffer.concat_newline();
        self.buffer.concat("objj_registerProtocol(the_protocol);");
        for table in model.tables() {
            self.emit_description_table(&table);
        }
        self.buffer.concat_newline();
        self.buffer.concat("}");

        self.env.declare_protocol(model.to_protocol_def());
        Ok(())
    }

    /// Runtime lookup of a protocol that must already be registered:
    ///
    /// ```text
    /// var aProtocol = objj_getProtocol("P");
    /// if (!aProtocol) throw new SyntaxError("*** Could not find definition for protocol \"P\"");
    /// ```
    pub(super) fn emit_protocol_lookup(&mut self, name: &str) {
        self.buffer
            .concat_fmt(format_args!("var aProtocol = objj_getProtocol(\"{name}\");"));
        self.buffer.concat_newline();
        self.buffer.concat_fmt(format_args!(
            "if (!aProtocol) throw new SyntaxError(\"*** Could not find definition for protocol \\\"{name}\\\"\");"
        ));
    }

    fn emit_description_table(&mut self, table: &DescriptionTable<'_>) {
        if table.methods.is_empty() {
            return;
        }
        self.buffer.concat_newline();
        self.buffer
            .concat("protocol_addMethodDescriptions(the_protocol, [");
        for (i, method) in table.methods.iter().enumerate() {
            if i > 0 {
                self.buffer.concat(",");
            }
            self.buffer.concat_newline();
            self.buffer.concat(&method_comment(method));
            self.buffer.concat_newline();
            self.buffer.concat("new objj_method(sel_getUid(");
            self.concat_quoted(&method.selector());
            self.buffer.concat("), null");
            if self.options.include_method_argument_type_signatures {
                self.buffer.concat_comma();
                self.buffer.concat(&type_signature(method));
            }
            self.buffer.concat(")");
        }
        self.buffer.concat_fmt(format_args!(
            "], {}, {});",
            table.required,
            table.kind == MethodKind::Instance
        ));
    }
}
