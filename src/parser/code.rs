//! Code pattern recognizers over comment-stripped, space-normalized text.
//!
//! No C grammar here: each recognizer is one regular expression for one
//! declaration shape the headers are required to use.
//! - `typedef struct _tag name_t;`
//! - `typedef struct [_tag] { ... } name_t;`
//! - `[typedef] enum [tag] { A, B = 1 << 1 } name;`
//! - `rtype name (params);`
//! - `typedef rtype (*name_t) (params);`

use crate::error::{ScanError, ScanResult};
use crate::model::{Enum, Parameter};
use regex::Regex;
use std::sync::LazyLock;

static RE_TYPE_FORWARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btypedef struct \w+ (\w+_t) ?;").unwrap());

static RE_TYPE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btypedef struct ?(?:\w+ ?)?\{[^{}]*\} ?(\w+_t) ?;").unwrap()
});

static RE_ENUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:typedef )?enum ?(?:\w+ ?)?\{([^{}]*)\} ?(\w+) ?;").unwrap()
});

// Return type is one word (optionally const) followed by stars or a space.
// Parameters run to the last `)` before `;` so that nested parentheses reach
// `clear_params` and get rejected there.
static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:const )?\w+(?: ?\*+ ?| ))([a-z0-9_]+) ?\(([^;]*)\) ?;").unwrap()
});

static RE_DELEGATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btypedef ((?:const )?\w+(?: ?\*+)?) ?\( ?\* ?(\w+) ?\) ?\(([^;]*)\) ?;").unwrap()
});

// Type is everything before the trailing identifier, ending in a space or `*`.
static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?[ *])(\w+)$").unwrap());

const VARIADIC: &str = "...";

/// Function signature as declared in code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFunction {
    pub name: String,
    pub rtype: String,
    pub params: Vec<Parameter>,
}

/// Function-pointer typedef as declared in code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDelegate {
    pub cname: String,
    pub rtype: String,
    pub params: Vec<Parameter>,
}

/// Typedef'd struct names, in declaration order, without duplicates.
pub fn find_types(buf: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = RE_TYPE_FORWARD
        .captures_iter(buf)
        .chain(RE_TYPE_BODY.captures_iter(buf))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();
    found.sort_by_key(|(offset, _)| *offset);

    let mut types: Vec<String> = Vec::new();
    for (_, name) in found {
        if !types.contains(&name) {
            types.push(name);
        }
    }
    types
}

/// Enum declarations. An enum is a flag set when any initializer shifts;
/// flag entries keep only their identifier.
pub fn find_enums(buf: &str) -> Vec<Enum> {
    RE_ENUM
        .captures_iter(buf)
        .map(|caps| {
            let body = &caps[1];
            let is_flags = body.contains("<<");
            let entries = body
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(|entry| {
                    if is_flags {
                        entry.split('=').next().unwrap_or(entry).trim().to_string()
                    } else {
                        entry.to_string()
                    }
                })
                .collect();
            Enum {
                name: caps[2].to_string(),
                is_flags,
                entries,
            }
        })
        .collect()
}

/// Function prototypes. A `typedef` "return type" is a delegate seen
/// through the function pattern and is skipped.
pub fn find_functions(buf: &str) -> ScanResult<Vec<CodeFunction>> {
    let mut functions = Vec::new();
    for caps in RE_FUNCTION.captures_iter(buf) {
        let rtype = caps[1].trim();
        if rtype == "typedef" {
            continue;
        }
        functions.push(CodeFunction {
            name: caps[2].to_string(),
            rtype: rtype.to_string(),
            params: clear_params(&caps[3])?,
        });
    }
    Ok(functions)
}

/// Function-pointer typedefs.
pub fn find_delegates(buf: &str) -> ScanResult<Vec<CodeDelegate>> {
    RE_DELEGATE
        .captures_iter(buf)
        .map(|caps| {
            Ok(CodeDelegate {
                cname: caps[2].to_string(),
                rtype: caps[1].trim().to_string(),
                params: clear_params(&caps[3])?,
            })
        })
        .collect()
}

/// Split a parameter list into typed, named parameters.
///
/// `void` alone means no parameters and `...` becomes
/// [`Parameter::Variadic`]. Anything else must be `type name`; a
/// function-pointer parameter is malformed.
pub fn clear_params(params: &str) -> ScanResult<Vec<Parameter>> {
    let trimmed = params.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .map(|item| {
            let item = item.trim();
            if item == VARIADIC {
                return Ok(Parameter::Variadic);
            }
            let malformed = || ScanError::MalformedParameter {
                param: item.to_string(),
                params: trimmed.to_string(),
            };
            // Function-pointer parameters have no `type name` form.
            if item.contains(['(', ')']) {
                return Err(malformed());
            }
            let caps = RE_PARAM.captures(item).ok_or_else(malformed)?;
            Ok(Parameter::named(caps[1].trim(), &caps[2]))
        })
        .collect()
}
