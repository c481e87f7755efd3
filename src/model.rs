//! Data model for a scanned header, as the binding generator consumes.
//!
//! Code-derived records (signatures, enums, struct names) are merged with
//! parsed doc blocks into the types below, then serialized as JSON.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

// -- Doc block side -----------------------------------------------------------

/// `@name` value: `Owner::symbol` or a bare `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifiedName {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl QualifiedName {
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            class: None,
        }
    }

    /// Key in the per-file symbol index: `Owner_symbol`, or the bare name.
    ///
    /// For conforming headers this equals the C symbol name, so
    /// `ta_iri::new` indexes as `ta_iri_new`.
    pub fn index_key(&self) -> String {
        match self.class {
            Some(ref class) => format!("{}_{}", class, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            Some(ref class) => write!(f, "{}::{}", class, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// `@type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Class,
    Enum,
    Delegate,
    Constructor,
    Destructor,
    Initializer,
    Getter,
    Setter,
    Method,
}

impl DocKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "class" => Self::Class,
            "enum" => Self::Enum,
            "delegate" => Self::Delegate,
            "constructor" => Self::Constructor,
            "destructor" => Self::Destructor,
            "initializer" => Self::Initializer,
            "getter" => Self::Getter,
            "setter" => Self::Setter,
            "method" => Self::Method,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
            Self::Constructor => "constructor",
            Self::Destructor => "destructor",
            Self::Initializer => "initializer",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Method => "method",
        }
    }
}

/// Parsed `@param` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamDoc {
    pub name: String,
    /// e.g. `optional`, `len`
    pub modifiers: Vec<String>,
    pub doc: String,
}

/// Parsed `@return` entry. `containing` is the element type of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnDoc {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containing: Option<String>,
}

/// One recognized `@key: value` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Name(QualifiedName),
    Type(DocKind),
    Param(ParamDoc),
    Raise(Vec<String>),
    See(Vec<String>),
    Super(String),
    Since(String),
    Return(ReturnDoc),
}

/// Parsed form of one doc block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Docstring {
    pub description: String,
    pub name: Option<QualifiedName>,
    pub kind: Option<DocKind>,
    /// `@param` entries in declaration order
    pub params: Vec<ParamDoc>,
    pub raise: Vec<String>,
    pub see: Vec<String>,
    pub super_type: Option<String>,
    pub since: Option<String>,
    pub returns: Option<ReturnDoc>,
}

impl Docstring {
    /// Record a tag. `@param` accumulates; every other tag overwrites.
    pub fn apply(&mut self, tag: Tag) {
        match tag {
            Tag::Name(name) => self.name = Some(name),
            Tag::Type(kind) => self.kind = Some(kind),
            Tag::Param(param) => self.params.push(param),
            Tag::Raise(list) => self.raise = list,
            Tag::See(list) => self.see = list,
            Tag::Super(value) => self.super_type = Some(value),
            Tag::Since(value) => self.since = Some(value),
            Tag::Return(ret) => self.returns = Some(ret),
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Renders the inner text of a doc block (without `/**` and `*/`).
impl fmt::Display for Docstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        if let Some(ref name) = self.name {
            writeln!(f, " * @name: {}", name)?;
        }
        if let Some(kind) = self.kind {
            writeln!(f, " * @type: {}", kind.as_str())?;
        }
        for param in &self.params {
            write!(f, " * @param: {}", param.name)?;
            if !param.modifiers.is_empty() {
                write!(f, " ({})", param.modifiers.join(", "))?;
            }
            if !param.doc.is_empty() {
                write!(f, ": {}", param.doc)?;
            }
            writeln!(f)?;
        }
        if !self.raise.is_empty() {
            writeln!(f, " * @raise: {}", self.raise.join(", "))?;
        }
        if !self.see.is_empty() {
            writeln!(f, " * @see: {}", self.see.join(", "))?;
        }
        if let Some(ref value) = self.super_type {
            writeln!(f, " * @super: {}", value)?;
        }
        if let Some(ref value) = self.since {
            writeln!(f, " * @since: {}", value)?;
        }
        if let Some(ref ret) = self.returns {
            match ret.containing {
                Some(ref inner) => writeln!(f, " * @return: {} ({})", ret.ty, inner)?,
                None => writeln!(f, " * @return: {}", ret.ty)?,
            }
        }
        if !self.description.is_empty() {
            writeln!(f, " *")?;
            for line in self.description.lines() {
                if line.is_empty() {
                    writeln!(f, " *")?;
                } else {
                    writeln!(f, " * {}", line)?;
                }
            }
        }
        f.write_str(" ")
    }
}

/// Documentation fields copied from a [`Docstring`] onto a model record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocFields {
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raise: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see: Vec<String>,
    #[serde(rename = "super", skip_serializing_if = "Option::is_none")]
    pub super_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnDoc>,
}

impl From<&Docstring> for DocFields {
    fn from(doc: &Docstring) -> Self {
        Self {
            description: doc.description.clone(),
            raise: doc.raise.clone(),
            see: doc.see.clone(),
            super_type: doc.super_type.clone(),
            since: doc.since.clone(),
            returns: doc.returns.clone(),
        }
    }
}

// -- Code side ----------------------------------------------------------------

/// A named function/delegate argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

/// One argument position. `...` is kept as [`Parameter::Variadic`] so that
/// consumers can skip it without shifting the positions before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Named(NamedParam),
    Variadic,
}

impl Parameter {
    pub fn named(ty: &str, name: &str) -> Self {
        Self::Named(NamedParam {
            name: name.to_string(),
            ty: ty.to_string(),
            modifiers: Vec::new(),
            doc: String::new(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(p) => Some(&p.name),
            Self::Variadic => None,
        }
    }
}

impl Serialize for Parameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Named(p) => p.serialize(serializer),
            Self::Variadic => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("variadic", &true)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub name: String,
    #[serde(rename = "isflags")]
    pub is_flags: bool,
    pub entries: Vec<String>,
}

/// Role of a function within its owning type, from `@type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Constructor,
    Destructor,
    Initializer,
    Getter,
    Setter,
    #[default]
    Method,
}

impl FunctionKind {
    /// Non-function kinds (and a missing `@type`) classify as plain methods.
    pub fn from_doc(kind: Option<DocKind>) -> Self {
        match kind {
            Some(DocKind::Constructor) => Self::Constructor,
            Some(DocKind::Destructor) => Self::Destructor,
            Some(DocKind::Initializer) => Self::Initializer,
            Some(DocKind::Getter) => Self::Getter,
            Some(DocKind::Setter) => Self::Setter,
            _ => Self::Method,
        }
    }
}

/// Free function or method: code signature merged with its doc block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: QualifiedName,
    /// C symbol name
    pub cname: String,
    #[serde(rename = "type")]
    pub kind: FunctionKind,
    pub rtype: String,
    pub params: Vec<Parameter>,
    #[serde(flatten)]
    pub doc: DocFields,
}

/// Function-pointer typedef.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delegate {
    pub name: String,
    pub cname: String,
    pub rtype: String,
    pub params: Vec<Parameter>,
    #[serde(flatten)]
    pub doc: DocFields,
}

/// A typedef'd struct exposed as a binding class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassType {
    pub cname: String,
    #[serde(flatten)]
    pub doc: DocFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor: Option<Function>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destructor: Option<Function>,
    /// Recorded but not part of the public method list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initializers: Vec<Function>,
    pub methods: Vec<Function>,
}

/// Complete model of one scanned file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub enums: Vec<Enum>,
    pub types: IndexMap<String, ClassType>,
    pub functions: Vec<Function>,
    pub delegates: IndexMap<String, Delegate>,
}
