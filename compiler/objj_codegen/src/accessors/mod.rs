//! Accessor Synthesizer
//!
//! Turns an `@accessors` attribute on an ivar into ordinary method
//! declarations, so synthesized methods go through the same emission path
//! (comments, function names, type signatures) as written ones.
//!
//! ```text
//! - (<type>)<getter>            { return self.<ivar>; }
//! - (void)set<Property>:(<type>)newValue
//!                               { if (self.<ivar> !== newValue) self.<ivar> = <value>; }
//! ```
//!
//! With copy semantics `<value>` sends `copy` through the new value's
//! method table, falling back to `_objj_forward`, and skips the send for a
//! null value.

use objj_ir::{
    build, AccessorSemantics, BinaryOp, Expr, IvarDeclaration, LogicalOp, MethodDeclaration,
    MethodKind, MethodParam, SelectorPart, Stmt,
};

/// Parameter name of synthesized setters.
pub const SETTER_PARAM: &str = "newValue";

/// Fallback invoked when a receiver has no implementation for a selector.
pub const FORWARD_FALLBACK: &str = "_objj_forward";

/// Getter and (unless read-only) setter for `ivar`; empty without an
/// accessor attribute.
pub fn synthesize(ivar: &IvarDeclaration) -> Vec<MethodDeclaration> {
    let Some(attribute) = &ivar.accessors else {
        return Vec::new();
    };
    let property = attribute.property.as_deref().unwrap_or(&ivar.name.name);

    let getter = attribute.getter.as_deref().unwrap_or(property);
    let mut methods = vec![method(
        ivar,
        &ivar.type_name,
        SelectorPart {
            keyword: getter.to_string(),
            param: None,
        },
        vec![build::ret(Some(ivar_access(ivar)))],
    )];

    if !attribute.readonly {
        let setter = match &attribute.setter {
            Some(setter) => setter.trim_end_matches(':').to_string(),
            None => format!("set{}", capitalize(property)),
        };
        let value = match attribute.semantics {
            AccessorSemantics::Copy => copy_of(build::ident(SETTER_PARAM)),
            AccessorSemantics::Plain | AccessorSemantics::Retain => build::ident(SETTER_PARAM),
        };
        let body = vec![build::if_stmt(
            build::binary(
                BinaryOp::StrictNotEq,
                ivar_access(ivar),
                build::ident(SETTER_PARAM),
            ),
            build::expr_stmt(build::assign(ivar_access(ivar), value)),
            None,
        )];
        methods.push(method(
            ivar,
            "void",
            SelectorPart {
                keyword: setter,
                param: Some(MethodParam {
                    name: build::name(SETTER_PARAM),
                    type_name: Some(ivar.type_name.clone()),
                }),
            },
            body,
        ));
    }
    methods
}

/// `value == null ? null : (value.isa.method_msgSend["copy"] || _objj_forward)(value, "copy")`
fn copy_of(value: Expr) -> Expr {
    let implementation = build::logical(
        LogicalOp::Or,
        build::index(
            build::member(build::member(value.clone(), "isa"), "method_msgSend"),
            build::str("copy"),
        ),
        build::ident(FORWARD_FALLBACK),
    );
    build::conditional(
        build::binary(BinaryOp::Eq, value.clone(), build::null()),
        build::null(),
        build::call(implementation, vec![value, build::str("copy")]),
    )
}

fn ivar_access(ivar: &IvarDeclaration) -> Expr {
    build::member(build::self_expr(), &ivar.name.name)
}

fn method(
    ivar: &IvarDeclaration,
    return_type: &str,
    part: SelectorPart,
    body: Vec<Stmt>,
) -> MethodDeclaration {
    MethodDeclaration {
        kind: MethodKind::Instance,
        return_type: Some(return_type.to_string()),
        parts: vec![part],
        variadic: false,
        body: Some(body),
        span: ivar.span,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
