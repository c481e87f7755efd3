//! Doc block parser: description text plus `@key: value` tags.
//!
//! A doc block looks like:
//!
//! ```text
//! /**
//!  * @name: ta_iri::new
//!  * @type: constructor
//!  * @param: iri (optional): Initial value
//!  *
//!  * Creates a new IRI instance.
//!  */
//! ```
//!
//! Lines carrying tags form the tag section; a blank line ends it. Every
//! other line belongs to the description, whichever order the two appear in.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;

static RE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*\s*").unwrap());

// Value runs until the next `@` or end of text.
static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^:@]+):([^@]*)").unwrap());

/// Parse the inner text of one doc block. `offset` locates the block in its
/// file for diagnostics.
pub fn parse_docstring(text: &str, offset: usize, diags: &mut Diagnostics) -> Docstring {
    let mut paragraphs: Vec<Vec<String>> = vec![Vec::new()];
    let mut tag_lines: Vec<String> = Vec::new();
    let mut in_tags = false;

    for raw in text.lines() {
        let line = RE_CONTINUATION.replace(raw, "").trim().to_string();
        if line.is_empty() {
            in_tags = false;
            if paragraphs.last().is_some_and(|p| !p.is_empty()) {
                paragraphs.push(Vec::new());
            }
        } else if in_tags || line.starts_with('@') {
            in_tags = true;
            tag_lines.push(line);
        } else if let Some(current) = paragraphs.last_mut() {
            current.push(line);
        }
    }

    let description = paragraphs
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut doc = Docstring {
        description,
        ..Default::default()
    };

    let section = tag_lines.join("\n");
    for caps in RE_TAG.captures_iter(&section) {
        let key = caps[1].split_whitespace().next().unwrap_or_default();
        let value = collapse(&caps[2]);
        if let Some(tag) = parse_tag(key, &value, offset, diags) {
            doc.apply(tag);
        }
    }

    doc
}

/// Dispatch one tag to its value parser. Unknown keys are reported and
/// skipped.
pub fn parse_tag(key: &str, value: &str, offset: usize, diags: &mut Diagnostics) -> Option<Tag> {
    let tag = match key {
        "name" => Tag::Name(tag_name(value)),
        "type" => match tag_type(value) {
            Some(kind) => Tag::Type(kind),
            None => {
                diags.push(Diagnostic::InvalidTag {
                    tag: key.to_string(),
                    value: value.trim().to_string(),
                    offset,
                });
                return None;
            }
        },
        "param" => Tag::Param(tag_param(value)),
        "raise" | "raises" => Tag::Raise(tag_list(value)),
        "see" => Tag::See(tag_list(value)),
        "super" => Tag::Super(tag_scalar(value)),
        "since" => Tag::Since(tag_scalar(value)),
        "return" | "returns" => Tag::Return(tag_return(value)),
        _ => {
            diags.push(Diagnostic::UnknownTag {
                tag: key.to_string(),
                offset,
            });
            return None;
        }
    };
    Some(tag)
}

/// `@name`: `Owner::symbol` or `symbol`.
pub fn tag_name(value: &str) -> QualifiedName {
    let value = value.trim();
    match value.split_once("::") {
        Some((class, name)) => QualifiedName {
            name: name.trim().to_string(),
            class: Some(class.trim().to_string()),
        },
        None => QualifiedName::bare(value),
    }
}

/// `@type`: a bare keyword.
pub fn tag_type(value: &str) -> Option<DocKind> {
    DocKind::from_keyword(value.trim())
}

/// `@param`: `name (mod1, mod2): doc text`, modifiers and doc optional.
pub fn tag_param(value: &str) -> ParamDoc {
    let (head, doc) = match value.split_once(':') {
        Some((head, doc)) => (head, doc.trim()),
        None => (value, ""),
    };

    let (name, modifiers) = match head.split_once('(') {
        Some((name, mods)) => (name, tag_list(&mods.replace(')', ""))),
        None => (head, Vec::new()),
    };

    ParamDoc {
        name: name.trim().to_string(),
        modifiers,
        doc: doc.to_string(),
    }
}

/// `@raise` / `@see`: comma-separated identifiers.
pub fn tag_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// `@super` / `@since`.
pub fn tag_scalar(value: &str) -> String {
    value.trim().to_string()
}

/// `@return`: `type (containedType)` or `type`.
pub fn tag_return(value: &str) -> ReturnDoc {
    match value.split_once('(') {
        Some((ty, inner)) => {
            let containing = inner.replace(')', "").trim().to_string();
            ReturnDoc {
                ty: ty.trim().to_string(),
                containing: (!containing.is_empty()).then_some(containing),
            }
        }
        None => ReturnDoc {
            ty: value.trim().to_string(),
            containing: None,
        },
    }
}

/// Tag values may wrap across lines.
fn collapse(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
