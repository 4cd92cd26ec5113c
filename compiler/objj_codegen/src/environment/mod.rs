//! Declaration environment.
//!
//! Classes, protocols and typedefs known to the compiler. The environment
//! outlives a single compilation unit: import-mode runs harvest
//! declarations into it so later units can reference them.
//!
//! Resolution of superclasses and protocols in generated code stays
//! name-based at runtime. The environment only decides whether a name is
//! known at all (declared, forward-declared or harvested) and supplies
//! inherited ivars and selectors.

use objj_ir::MethodKind;
use rustc_hash::{FxHashMap, FxHashSet};

/// A declared instance variable.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvarDef {
    pub name: String,
    pub type_name: String,
}

/// A known class.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDef {
    pub name: String,
    pub superclass: Option<String>,
    pub ivars: Vec<IvarDef>,
    pub instance_selectors: FxHashSet<String>,
    pub class_selectors: FxHashSet<String>,
    pub protocols: Vec<String>,
    /// Only known through `@class`.
    pub forward: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDef {
            name: name.into(),
            ..ClassDef::default()
        }
    }

    fn forward(name: &str) -> Self {
        ClassDef {
            forward: true,
            ..ClassDef::new(name)
        }
    }

    pub fn selectors(&self, kind: MethodKind) -> &FxHashSet<String> {
        match kind {
            MethodKind::Instance => &self.instance_selectors,
            MethodKind::Class => &self.class_selectors,
        }
    }
}

/// A known protocol.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtocolDef {
    pub name: String,
    pub inherited: Vec<String>,
    /// Required selectors with their method kind, in declaration order.
    pub required: Vec<(MethodKind, String)>,
    /// Only known through `@protocol Name;`.
    pub forward: bool,
}

/// Known classes, protocols and typedefs.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Environment {
    classes: FxHashMap<String, ClassDef>,
    protocols: FxHashMap<String, ProtocolDef>,
    typedefs: FxHashSet<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class declaration, replacing a forward declaration.
    pub fn declare_class(&mut self, class: ClassDef) {
        tracing::debug!(class = %class.name, superclass = ?class.superclass, "declare class");
        self.classes.insert(class.name.clone(), class);
    }

    /// Register a `@class` forward declaration. Known classes are kept.
    pub fn forward_class(&mut self, name: &str) {
        self.classes
            .entry(name.to_string())
            .or_insert_with(|| ClassDef::forward(name));
    }

    /// Add category methods and protocols to a known class.
    pub fn extend_class<'a>(
        &mut self,
        name: &str,
        instance_selectors: impl IntoIterator<Item = String>,
        class_selectors: impl IntoIterator<Item = String>,
        protocols: impl IntoIterator<Item = &'a str>,
    ) {
        if let Some(class) = self.classes.get_mut(name) {
            class.instance_selectors.extend(instance_selectors);
            class.class_selectors.extend(class_selectors);
            class
                .protocols
                .extend(protocols.into_iter().map(str::to_string));
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Put back an entry saved with [`Environment::class`] before a
    /// declaration that failed. `None` forgets the name again.
    pub fn restore_class(&mut self, name: &str, saved: Option<ClassDef>) {
        tracing::debug!(class = %name, known = saved.is_some(), "restore class");
        match saved {
            Some(class) => {
                self.classes.insert(name.to_string(), class);
            }
            None => {
                self.classes.remove(name);
            }
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Register a protocol declaration, replacing a forward declaration.
    pub fn declare_protocol(&mut self, protocol: ProtocolDef) {
        tracing::debug!(protocol = %protocol.name, "declare protocol");
        self.protocols.insert(protocol.name.clone(), protocol);
    }

    /// Register a `@protocol Name;` forward declaration.
    pub fn forward_protocol(&mut self, name: &str) {
        self.protocols
            .entry(name.to_string())
            .or_insert_with(|| ProtocolDef {
                name: name.to_string(),
                forward: true,
                ..ProtocolDef::default()
            });
    }

    pub fn has_protocol(&self, name: &str) -> bool {
        self.protocols.contains_key(name)
    }

    pub fn declare_typedef(&mut self, name: &str) {
        tracing::debug!(typedef = %name, "declare typedef");
        self.typedefs.insert(name.to_string());
    }

    pub fn has_typedef(&self, name: &str) -> bool {
        self.typedefs.contains(name)
    }

    /// `name` and its known superclasses, nearest first.
    ///
    /// Stops at the first unknown class and at cycles.
    pub fn superclass_chain<'a>(&'a self, name: &str) -> Vec<&'a ClassDef> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = self.classes.get(name);
        while let Some(class) = current {
            if !seen.insert(class.name.as_str()) {
                break;
            }
            chain.push(class);
            current = class
                .superclass
                .as_deref()
                .and_then(|superclass| self.classes.get(superclass));
        }
        chain
    }

    /// Ivars of `name` and its superclasses, root class first.
    pub fn all_ivars(&self, name: &str) -> Vec<&IvarDef> {
        self.superclass_chain(name)
            .into_iter()
            .rev()
            .flat_map(|class| class.ivars.iter())
            .collect()
    }

    /// Whether `class` or any known superclass implements `selector`.
    pub fn responds_to(&self, class: &str, kind: MethodKind, selector: &str) -> bool {
        self.superclass_chain(class)
            .into_iter()
            .any(|class| class.selectors(kind).contains(selector))
    }

    /// Required selectors of `protocol` and every protocol it inherits.
    ///
    /// Unknown protocols contribute nothing; shared ancestors are visited
    /// once.
    pub fn required_methods(&self, protocol: &str) -> Vec<(MethodKind, String)> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut pending = vec![protocol];
        while let Some(name) = pending.pop() {
            if !seen.insert(name) {
                continue;
            }
            if let Some(protocol) = self.protocols.get(name) {
                out.extend(protocol.required.iter().cloned());
                pending.extend(protocol.inherited.iter().rev().map(String::as_str));
            }
        }
        out
    }
}
