//! Function-level hoisting.
//!
//! `var` bindings and function declarations belong to the enclosing
//! function body no matter which block they appear in, so they are
//! declared before the body is lowered.

use objj_ir::{ForInTarget, ForInit, Ident, Stmt, StmtKind};

use super::DeclKind;

/// Names a function body declares, in source order. Nested function
/// bodies are not entered.
pub fn hoisted_declarations(body: &[Stmt]) -> Vec<(&Ident, DeclKind)> {
    let mut out = Vec::new();
    for stmt in body {
        collect(stmt, &mut out);
    }
    out
}

fn collect<'a>(stmt: &'a Stmt, out: &mut Vec<(&'a Ident, DeclKind)>) {
    match &stmt.kind {
        StmtKind::Var(declarators) => {
            out.extend(declarators.iter().map(|d| (&d.name, DeclKind::Var)));
        }
        StmtKind::Function(function) => {
            if let Some(name) = &function.name {
                out.push((name, DeclKind::Function));
            }
        }
        StmtKind::If {
            consequent,
            alternate,
            ..
        } => {
            collect(consequent, out);
            if let Some(alternate) = alternate {
                collect(alternate, out);
            }
        }
        StmtKind::While { body, .. } | StmtKind::DoWhile { body, .. } => collect(body, out),
        StmtKind::For { init, body, .. } => {
            if let Some(ForInit::Var(declarators)) = init {
                out.extend(declarators.iter().map(|d| (&d.name, DeclKind::Var)));
            }
            collect(body, out);
        }
        StmtKind::ForIn { target, body, .. } => {
            if let ForInTarget::Var(name) = target {
                out.push((name, DeclKind::Var));
            }
            collect(body, out);
        }
        StmtKind::Block(stmts) => {
            for stmt in stmts {
                collect(stmt, out);
            }
        }
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            let handler_body = handler.iter().flat_map(|h| h.body.iter());
            let finalizer_body = finalizer.iter().flatten();
            for stmt in block.iter().chain(handler_body).chain(finalizer_body) {
                collect(stmt, out);
            }
        }
        StmtKind::Switch { cases, .. } => {
            for stmt in cases.iter().flat_map(|c| c.body.iter()) {
                collect(stmt, out);
            }
        }
        StmtKind::Expr(_)
        | StmtKind::Return(_)
        | StmtKind::Break(_)
        | StmtKind::Continue(_)
        | StmtKind::Throw(_)
        | StmtKind::Empty
        | StmtKind::Class(_)
        | StmtKind::Protocol(_)
        | StmtKind::Typedef(_)
        | StmtKind::ClassForward(_)
        | StmtKind::ProtocolForward(_)
        | StmtKind::Import(_)
        | StmtKind::Global(_) => {}
    }
}
