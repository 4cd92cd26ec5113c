//! Class and protocol models.
//!
//! A [`ClassModel`] is a class declaration with its accessors synthesized
//! and its methods split into instance and class tables, in emission
//! order. A [`ProtocolModel`] splits method descriptions into the four
//! required/optional by instance/class tables.
//!
//! Also home of the per-method text helpers shared by class and protocol
//! emission: comments, type signatures and function names.

use std::borrow::Cow;

use objj_ir::{ClassDeclaration, MethodDeclaration, MethodKind, ProtocolDeclaration};

use crate::accessors;
use crate::environment::{ClassDef, IvarDef, ProtocolDef};

/// Type assumed where a declaration spells none.
pub const DEFAULT_TYPE: &str = "id";

/// A class (or category) ready for emission.
#[derive(Debug)]
pub struct ClassModel<'a> {
    pub decl: &'a ClassDeclaration,
    /// Synthesized accessors first, then declared instance methods.
    pub instance_methods: Vec<Cow<'a, MethodDeclaration>>,
    pub class_methods: Vec<&'a MethodDeclaration>,
}

impl<'a> ClassModel<'a> {
    pub fn new(decl: &'a ClassDeclaration) -> Self {
        let synthesized = decl
            .ivars
            .iter()
            .flat_map(accessors::synthesize)
            .map(Cow::Owned);
        let declared = decl
            .methods
            .iter()
            .filter(|m| m.kind == MethodKind::Instance)
            .map(Cow::Borrowed);
        ClassModel {
            decl,
            instance_methods: synthesized.chain(declared).collect(),
            class_methods: decl
                .methods
                .iter()
                .filter(|m| m.kind == MethodKind::Class)
                .collect(),
        }
    }

    pub fn name(&self) -> &'a str {
        &self.decl.name.name
    }

    pub fn superclass(&self) -> Option<&'a str> {
        self.decl.superclass.as_ref().map(|s| s.name.as_str())
    }

    pub fn category(&self) -> Option<&'a str> {
        self.decl.category.as_ref().map(|c| c.name.as_str())
    }

    pub fn protocols(&self) -> impl Iterator<Item = &'a str> {
        self.decl.protocols.iter().map(|p| p.name.as_str())
    }

    pub fn instance_selectors(&self) -> Vec<String> {
        self.instance_methods.iter().map(|m| m.selector()).collect()
    }

    pub fn class_selectors(&self) -> Vec<String> {
        self.class_methods.iter().map(|m| m.selector()).collect()
    }

    /// Environment entry for a non-category class.
    pub fn to_class_def(&self) -> ClassDef {
        ClassDef {
            superclass: self.superclass().map(str::to_string),
            ivars: self
                .decl
                .ivars
                .iter()
                .map(|ivar| IvarDef {
                    name: ivar.name.name.clone(),
                    type_name: ivar.type_name.clone(),
                })
                .collect(),
            instance_selectors: self.instance_selectors().into_iter().collect(),
            class_selectors: self.class_selectors().into_iter().collect(),
            protocols: self.protocols().map(str::to_string).collect(),
            ..ClassDef::new(self.name())
        }
    }

    /// `// @implementation Foo : Bar <P, Q>` / `// @implementation Foo (Cat)`
    pub fn header_comment(&self) -> String {
        let mut out = format!("// @implementation {}", self.name());
        if let Some(category) = self.category() {
            out.push_str(&format!(" ({category})"));
        } else if let Some(superclass) = self.superclass() {
            out.push_str(&format!(" : {superclass}"));
        }
        let protocols: Vec<_> = self.protocols().collect();
        if !protocols.is_empty() {
            out.push_str(&format!(" <{}>", protocols.join(", ")));
        }
        out
    }

    /// Name of the function implementing `method`: `$Foo__setX_y_`, or
    /// `$Foo_Cat__setX_y_` inside a category.
    pub fn function_name(&self, method: &MethodDeclaration) -> String {
        let owner = match self.category() {
            Some(category) => format!("{}_{category}", self.name()),
            None => self.name().to_string(),
        };
        format!("${owner}__{}", method.selector().replace(':', "_"))
    }

    /// Expression naming the statically known superclass for super sends.
    ///
    /// Inside class methods the metaclass chain is used.
    pub fn super_class_ref(&self, kind: MethodKind) -> String {
        let getter = match kind {
            MethodKind::Instance => "objj_getClass",
            MethodKind::Class => "objj_getMetaClass",
        };
        format!("{getter}(\"{}\").super_class", self.name())
    }
}

/// A protocol ready for emission.
#[derive(Debug)]
pub struct ProtocolModel<'a> {
    pub decl: &'a ProtocolDeclaration,
}

/// One `protocol_addMethodDescriptions` table.
#[derive(Debug)]
pub struct DescriptionTable<'a> {
    pub required: bool,
    pub kind: MethodKind,
    pub methods: Vec<&'a MethodDeclaration>,
}

impl<'a> ProtocolModel<'a> {
    pub fn new(decl: &'a ProtocolDeclaration) -> Self {
        ProtocolModel { decl }
    }

    pub fn name(&self) -> &'a str {
        &self.decl.name.name
    }

    /// Tables in emission order: required instance, required class,
    /// optional instance, optional class. Empty tables are included.
    pub fn tables(&self) -> [DescriptionTable<'a>; 4] {
        let split = |methods: &'a [MethodDeclaration], required: bool, kind: MethodKind| {
            DescriptionTable {
                required,
                kind,
                methods: methods.iter().filter(|m| m.kind == kind).collect(),
            }
        };
        [
            split(&self.decl.required, true, MethodKind::Instance),
            split(&self.decl.required, true, MethodKind::Class),
            split(&self.decl.optional, false, MethodKind::Instance),
            split(&self.decl.optional, false, MethodKind::Class),
        ]
    }

    pub fn to_protocol_def(&self) -> ProtocolDef {
        ProtocolDef {
            name: self.name().to_string(),
            inherited: self
                .decl
                .inherited
                .iter()
                .map(|p| p.name.clone())
                .collect(),
            required: self
                .decl
                .required
                .iter()
                .map(|m| (m.kind, m.selector()))
                .collect(),
            forward: false,
        }
    }

    /// `// @protocol Foo <Bar, Baz>`
    pub fn header_comment(&self) -> String {
        let mut out = format!("// @protocol {}", self.name());
        if !self.decl.inherited.is_empty() {
            let inherited: Vec<_> = self.decl.inherited.iter().map(|p| p.name.as_str()).collect();
            out.push_str(&format!(" <{}>", inherited.join(", ")));
        }
        out
    }
}

/// `// - (void)setX:(int)a y:(int)b`
pub fn method_comment(method: &MethodDeclaration) -> String {
    let mut out = format!(
        "// {} ({})",
        method.kind.sigil(),
        method.return_type.as_deref().unwrap_or(DEFAULT_TYPE)
    );
    let parts: Vec<String> = method
        .parts
        .iter()
        .map(|part| match &part.param {
            Some(param) => format!(
                "{}:({}){}",
                part.keyword,
                param.type_name.as_deref().unwrap_or(DEFAULT_TYPE),
                param.name.name
            ),
            None => part.keyword.clone(),
        })
        .collect();
    out.push_str(&parts.join(" "));
    if method.variadic {
        out.push_str(", ...");
    }
    out
}

/// `["void", "int", "int"]`: return type then parameter types.
pub fn type_signature(method: &MethodDeclaration) -> String {
    let types: Vec<String> = std::iter::once(method.return_type.as_deref())
        .chain(method.params().map(|p| p.type_name.as_deref()))
        .map(|t| format!("\"{}\"", t.unwrap_or(DEFAULT_TYPE)))
        .collect();
    format!("[{}]", types.join(", "))
}
