//! `@typedef` emission.

use objj_ir::TypedefDeclaration;

use super::Generator;
use crate::buffer::OutputBuffer;

impl<B: OutputBuffer> Generator<'_, B> {
    /// One allocate/register block per name, in declaration order.
    pub(super) fn emit_typedef(&mut self, typedef: &TypedefDeclaration) {
        let names: Vec<&str> = typedef.names.iter().map(|n| n.name.as_str()).collect();
        self.buffer
            .concat_fmt(format_args!("// @typedef {}", names.join(", ")));
        for name in names {
            self.buffer.concat_newline();
            self.buffer.concat("{var the_typedef = objj_allocateTypeDef(");
            self.concat_quoted(name);
            self.buffer.concat(");");
            self.buffer.concat_newline();
            self.buffer.concat("objj_registerTypeDef(the_typedef);");
            self.buffer.concat_newline();
            self.buffer.concat("}");
            self.env.declare_typedef(name);
        }
    }
}
