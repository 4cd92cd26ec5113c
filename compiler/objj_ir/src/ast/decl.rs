//! Dialect declarations: classes, protocols, methods, ivars, typedefs.

use crate::Span;

use super::stmt::Stmt;
use super::Ident;

/// `@implementation Name : Super <Protocols> { ivars } methods @end`
///
/// A category (`@implementation Name (Category)`) carries `category` and no
/// ivars.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDeclaration {
    pub name: Ident,
    pub superclass: Option<Ident>,
    pub category: Option<Ident>,
    pub protocols: Vec<Ident>,
    pub ivars: Vec<IvarDeclaration>,
    pub methods: Vec<MethodDeclaration>,
    pub span: Span,
}

impl ClassDeclaration {
    pub fn is_category(&self) -> bool {
        self.category.is_some()
    }
}

/// Instance variable declaration.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvarDeclaration {
    pub type_name: String,
    pub name: Ident,
    pub accessors: Option<AccessorAttribute>,
    /// `@outlet`
    pub outlet: bool,
    pub span: Span,
}

/// `@accessors(property=..., getter=..., setter=..., readonly, copy)`
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessorAttribute {
    pub property: Option<String>,
    pub getter: Option<String>,
    pub setter: Option<String>,
    pub readonly: bool,
    pub semantics: AccessorSemantics,
}

/// Setter assignment semantics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessorSemantics {
    #[default]
    Plain,
    Copy,
    Retain,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MethodKind {
    /// `-`
    Instance,
    /// `+`
    Class,
}

impl MethodKind {
    pub const fn sigil(self) -> char {
        match self {
            Self::Instance => '-',
            Self::Class => '+',
        }
    }
}

/// Method declaration. Protocol method descriptions have no body.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodDeclaration {
    pub kind: MethodKind,
    pub return_type: Option<String>,
    pub parts: Vec<SelectorPart>,
    /// Trailing `, ...`
    pub variadic: bool,
    pub body: Option<Vec<Stmt>>,
    pub span: Span,
}

impl MethodDeclaration {
    /// Colon-joined selector (`foo`, `foo:bar:`).
    pub fn selector(&self) -> String {
        match self.parts.as_slice() {
            [part] if part.param.is_none() => part.keyword.clone(),
            parts => parts.iter().map(|p| format!("{}:", p.keyword)).collect(),
        }
    }

    pub fn params(&self) -> impl Iterator<Item = &MethodParam> {
        self.parts.iter().filter_map(|p| p.param.as_ref())
    }
}

/// `keyword:(type)name`, or a bare `keyword` for unary selectors.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorPart {
    pub keyword: String,
    pub param: Option<MethodParam>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodParam {
    pub name: Ident,
    pub type_name: Option<String>,
}

impl MethodParam {
    /// Type spelling that marks a by-reference parameter.
    pub const REF_TYPE: &'static str = "@ref";

    pub fn is_ref(&self) -> bool {
        self.type_name.as_deref() == Some(Self::REF_TYPE)
    }
}

/// `@protocol Name <Inherited> ... @optional ... @end`
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtocolDeclaration {
    pub name: Ident,
    pub inherited: Vec<Ident>,
    pub required: Vec<MethodDeclaration>,
    pub optional: Vec<MethodDeclaration>,
    pub span: Span,
}

/// `@typedef A, B`
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypedefDeclaration {
    pub names: Vec<Ident>,
    pub span: Span,
}

/// `@import <Framework/File.j>` (`local == false`) or `@import "File.j"`.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportDeclaration {
    pub path: String,
    pub local: bool,
    pub span: Span,
}
