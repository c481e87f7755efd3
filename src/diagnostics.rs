//! Non-fatal findings collected while scanning.
//!
//! The scanner never logs these itself; they are returned to the caller,
//! which decides how to report them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A block comment with no closing marker; truncated at end of input.
    UnterminatedComment { offset: usize },
    /// `offset` is where the doc block carrying the tag starts.
    UnknownTag { tag: String, offset: usize },
    InvalidTag { tag: String, value: String, offset: usize },
    /// A doc block without `@name` cannot be matched to any symbol.
    MissingName { offset: usize },
    UndocumentedFunction { name: String },
    UndocumentedDelegate { name: String },
    /// A `@param` naming no parameter of the signature.
    UnknownParameter { function: String, param: String },
    DuplicateConstructor { class: String, previous: String, current: String },
    DuplicateDestructor { class: String, previous: String, current: String },
    ModuleCollision { module: String },
    /// A named doc block that no type, enum, function or delegate claimed.
    UnusedDocstring { name: String, offset: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedComment { offset } => {
                write!(f, "unterminated comment at byte {}, truncated", offset)
            }
            Self::UnknownTag { tag, offset } => {
                write!(f, "unknown tag @{} in doc block at byte {}", tag, offset)
            }
            Self::InvalidTag { tag, value, offset } => write!(
                f,
                "invalid value for @{} in doc block at byte {}: {:?}",
                tag, offset, value
            ),
            Self::MissingName { offset } => {
                write!(f, "doc block at byte {} has no @name, ignored", offset)
            }
            Self::UndocumentedFunction { name } => {
                write!(f, "refusing to add function {} without a docstring", name)
            }
            Self::UndocumentedDelegate { name } => {
                write!(f, "refusing to add delegate {} without a docstring", name)
            }
            Self::UnknownParameter { function, param } => {
                write!(f, "{} documents unknown parameter {}", function, param)
            }
            Self::DuplicateConstructor {
                class,
                previous,
                current,
            } => write!(
                f,
                "{} already has constructor {}, replaced by {}",
                class, previous, current
            ),
            Self::DuplicateDestructor {
                class,
                previous,
                current,
            } => write!(
                f,
                "{} already has destructor {}, replaced by {}",
                class, previous, current
            ),
            Self::ModuleCollision { module } => {
                write!(f, "module {} scanned twice, keeping the last one", module)
            }
            Self::UnusedDocstring { name, offset } => write!(
                f,
                "doc block {} at byte {} matches no declaration",
                name, offset
            ),
        }
    }
}

/// Collector threaded through one scan.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
