//! Tree construction helpers.
//!
//! Parser collaborators and tests build trees through these instead of
//! spelling out `Box::new` and dummy spans at every node.

use crate::ast::{
    AccessorAttribute, AssignOp, BinaryOp, ClassDeclaration, Expr, ExprKind, Function, Ident,
    IvarDeclaration, LogicalOp, MemberProperty, MessageSend, MethodDeclaration, MethodKind,
    MethodParam, Param, Property, PropertyKey, ProtocolDeclaration, SelectorPart, SendPart, Stmt,
    StmtKind, TypedefDeclaration, UnaryOp, UpdateOp, VarDeclarator,
};
use crate::Span;

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

pub fn name(name: &str) -> Ident {
    Ident::new(name, Span::DUMMY)
}

// Expressions

pub fn ident(name: &str) -> Expr {
    expr(ExprKind::Ident(name.to_string()))
}

pub fn num(raw: &str) -> Expr {
    expr(ExprKind::Number(raw.to_string()))
}

pub fn str(value: &str) -> Expr {
    expr(ExprKind::Str(value.to_string()))
}

pub fn boolean(value: bool) -> Expr {
    expr(ExprKind::Bool(value))
}

pub fn null() -> Expr {
    expr(ExprKind::Null)
}

pub fn this() -> Expr {
    expr(ExprKind::This)
}

pub fn self_expr() -> Expr {
    expr(ExprKind::SelfExpr)
}

pub fn super_expr() -> Expr {
    expr(ExprKind::Super)
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn update(op: UpdateOp, prefix: bool, operand: Expr) -> Expr {
    expr(ExprKind::Update {
        op,
        prefix,
        operand: Box::new(operand),
    })
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    assign_op(AssignOp::Assign, target, value)
}

pub fn assign_op(op: AssignOp, target: Expr, value: Expr) -> Expr {
    expr(ExprKind::Assign {
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Expr {
    expr(ExprKind::Conditional {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    })
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call {
        callee: Box::new(callee),
        args,
    })
}

pub fn new(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::New {
        callee: Box::new(callee),
        args,
    })
}

pub fn member(object: Expr, property: &str) -> Expr {
    expr(ExprKind::Member {
        object: Box::new(object),
        property: MemberProperty::Named(property.to_string()),
    })
}

pub fn index(object: Expr, property: Expr) -> Expr {
    expr(ExprKind::Member {
        object: Box::new(object),
        property: MemberProperty::Computed(Box::new(property)),
    })
}

pub fn sequence(exprs: Vec<Expr>) -> Expr {
    expr(ExprKind::Sequence(exprs))
}

pub fn array(elements: Vec<Expr>) -> Expr {
    expr(ExprKind::Array(elements.into_iter().map(Some).collect()))
}

pub fn object(entries: Vec<(&str, Expr)>) -> Expr {
    expr(ExprKind::Object(
        entries
            .into_iter()
            .map(|(key, value)| Property {
                key: PropertyKey::Ident(key.to_string()),
                value,
                span: Span::DUMMY,
            })
            .collect(),
    ))
}

pub fn function(name: Option<&str>, params: &[&str], body: Vec<Stmt>) -> Function {
    Function {
        name: name.map(self::name),
        params: params
            .iter()
            .map(|p| Param {
                name: self::name(p),
                by_ref: false,
            })
            .collect(),
        body,
        span: Span::DUMMY,
    }
}

pub fn function_expr(params: &[&str], body: Vec<Stmt>) -> Expr {
    expr(ExprKind::Function(Box::new(function(None, params, body))))
}

/// Builds a message send. With no keyword parts, `unary` names the selector.
pub fn message(receiver: Expr, unary: &str, parts: Vec<(&str, Expr)>) -> MessageSend {
    let parts = if parts.is_empty() {
        vec![SendPart {
            keyword: unary.to_string(),
            arg: None,
        }]
    } else {
        parts
            .into_iter()
            .map(|(keyword, arg)| SendPart {
                keyword: keyword.to_string(),
                arg: Some(arg),
            })
            .collect()
    };
    MessageSend {
        receiver,
        parts,
        varargs: Vec::new(),
        span: Span::DUMMY,
    }
}

pub fn send(receiver: Expr, unary: &str, parts: Vec<(&str, Expr)>) -> Expr {
    expr(ExprKind::MessageSend(Box::new(message(receiver, unary, parts))))
}

pub fn selector(selector: &str) -> Expr {
    expr(ExprKind::Selector(selector.to_string()))
}

pub fn protocol_literal(name: &str) -> Expr {
    expr(ExprKind::ProtocolLiteral(name.to_string()))
}

pub fn reference(operand: Expr) -> Expr {
    expr(ExprKind::Ref(Box::new(operand)))
}

pub fn deref(operand: Expr) -> Expr {
    expr(ExprKind::Deref(Box::new(operand)))
}

// Statements

pub fn expr_stmt(expr: Expr) -> Stmt {
    stmt(StmtKind::Expr(expr))
}

pub fn var(name: &str, init: Option<Expr>) -> Stmt {
    stmt(StmtKind::Var(vec![VarDeclarator {
        name: self::name(name),
        init,
    }]))
}

pub fn ret(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(value))
}

pub fn block(body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(body))
}

pub fn if_stmt(test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        test,
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    })
}

pub fn function_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Function(function(Some(name), params, body)))
}

pub fn class_stmt(class: ClassDeclaration) -> Stmt {
    stmt(StmtKind::Class(class))
}

pub fn protocol_stmt(protocol: ProtocolDeclaration) -> Stmt {
    stmt(StmtKind::Protocol(protocol))
}

pub fn typedef_stmt(names: &[&str]) -> Stmt {
    stmt(StmtKind::Typedef(TypedefDeclaration {
        names: names.iter().map(|n| name(n)).collect(),
        span: Span::DUMMY,
    }))
}

pub fn class_forward(names: &[&str]) -> Stmt {
    stmt(StmtKind::ClassForward(names.iter().map(|n| name(n)).collect()))
}

pub fn protocol_forward(names: &[&str]) -> Stmt {
    stmt(StmtKind::ProtocolForward(
        names.iter().map(|n| name(n)).collect(),
    ))
}

pub fn global(names: &[&str]) -> Stmt {
    stmt(StmtKind::Global(names.iter().map(|n| name(n)).collect()))
}

// Declarations

pub fn class(name: &str, superclass: Option<&str>) -> ClassDeclaration {
    ClassDeclaration {
        name: self::name(name),
        superclass: superclass.map(self::name),
        category: None,
        protocols: Vec::new(),
        ivars: Vec::new(),
        methods: Vec::new(),
        span: Span::DUMMY,
    }
}

pub fn category(name: &str, category: &str) -> ClassDeclaration {
    ClassDeclaration {
        category: Some(self::name(category)),
        ..class(name, None)
    }
}

pub fn ivar(type_name: &str, name: &str) -> IvarDeclaration {
    IvarDeclaration {
        type_name: type_name.to_string(),
        name: self::name(name),
        accessors: None,
        outlet: false,
        span: Span::DUMMY,
    }
}

pub fn ivar_with_accessors(
    type_name: &str,
    name: &str,
    accessors: AccessorAttribute,
) -> IvarDeclaration {
    IvarDeclaration {
        accessors: Some(accessors),
        ..ivar(type_name, name)
    }
}

/// Builds a method. Each part is `(keyword, Some((type, param)))`; a single
/// `(keyword, None)` part is a unary selector.
pub fn method(
    kind: MethodKind,
    return_type: Option<&str>,
    parts: Vec<(&str, Option<(&str, &str)>)>,
    body: Vec<Stmt>,
) -> MethodDeclaration {
    MethodDeclaration {
        body: Some(body),
        ..method_description(kind, return_type, parts)
    }
}

/// Builds a body-less method description (protocol member).
pub fn method_description(
    kind: MethodKind,
    return_type: Option<&str>,
    parts: Vec<(&str, Option<(&str, &str)>)>,
) -> MethodDeclaration {
    MethodDeclaration {
        kind,
        return_type: return_type.map(|t| t.to_string()),
        parts: parts
            .into_iter()
            .map(|(keyword, param)| SelectorPart {
                keyword: keyword.to_string(),
                param: param.map(|(type_name, param)| MethodParam {
                    name: self::name(param),
                    type_name: Some(type_name.to_string()),
                }),
            })
            .collect(),
        variadic: false,
        body: None,
        span: Span::DUMMY,
    }
}

pub fn protocol(name: &str, inherited: &[&str]) -> ProtocolDeclaration {
    ProtocolDeclaration {
        name: self::name(name),
        inherited: inherited.iter().map(|n| self::name(n)).collect(),
        required: Vec::new(),
        optional: Vec::new(),
        span: Span::DUMMY,
    }
}
