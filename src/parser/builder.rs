//! Model builder: merges code records with doc blocks into a Module.
//!
//! Code is authoritative for names, types and parameter order; doc blocks
//! contribute descriptions, modifiers, cross-references and the `@type`
//! classification that decides where a function ends up.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ScanError, ScanResult};
use crate::model::*;
use crate::parser::code::{self, CodeDelegate, CodeFunction};
use crate::parser::comments::{find_docstrings, strip_comments, strip_directives, strip_spaces};
use crate::parser::tags::parse_docstring;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Methods with this name register callbacks and are bound by hand.
const RESERVED_METHOD: &str = "set_handler";

const TYPE_SUFFIX: &str = "_t";

/// Scanner configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Library prefix stripped from `types` keys and class qualifiers,
    /// e.g. `ta_` turns `ta_iri_t` into `iri`.
    pub lib_prefix: Option<String>,
}

impl ScanOptions {
    fn type_key(&self, name: &str) -> String {
        self.lib_prefix
            .as_deref()
            .and_then(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name)
            .to_string()
    }
}

struct IndexedDoc {
    offset: usize,
    doc: Docstring,
    used: bool,
}

/// Doc blocks of one file in source order, keyed by
/// [`QualifiedName::index_key`]. Remembers which ones a declaration claimed.
#[derive(Default)]
struct SymbolIndex {
    entries: IndexMap<String, IndexedDoc>,
}

impl SymbolIndex {
    fn insert(&mut self, key: String, offset: usize, doc: Docstring) {
        self.entries.insert(
            key,
            IndexedDoc {
                offset,
                doc,
                used: false,
            },
        );
    }

    /// Look up a doc block and mark it claimed.
    fn claim(&mut self, key: &str) -> Option<&Docstring> {
        let entry = self.entries.get_mut(key)?;
        entry.used = true;
        Some(&entry.doc)
    }

    /// Report every doc block no declaration claimed.
    fn report_unused(&self, diags: &mut Diagnostics) {
        for (name, entry) in self.entries.iter().filter(|(_, e)| !e.used) {
            diags.push(Diagnostic::UnusedDocstring {
                name: name.clone(),
                offset: entry.offset,
            });
        }
    }
}

/// Scan one file from disk. The module is named after the file stem.
pub fn scan_file(path: &Path, options: &ScanOptions, diags: &mut Diagnostics) -> ScanResult<Module> {
    let content =
        fs::read_to_string(path).map_err(|e| ScanError::Io(path.to_path_buf(), e))?;
    scan_source(&module_name(path), &content, options, diags)
}

/// Scan header text into a Module.
pub fn scan_source(
    name: &str,
    buf: &str,
    options: &ScanOptions,
    diags: &mut Diagnostics,
) -> ScanResult<Module> {
    let mut index = index_docstrings(buf, diags);

    let code = strip_spaces(&strip_directives(&strip_comments(buf)));
    let types = code::find_types(&code);
    let enums = code::find_enums(&code);
    let functions = code::find_functions(&code)?;
    let delegates = code::find_delegates(&code)?;

    // Enum blocks have no slot in the model but still count as used.
    for e in &enums {
        index.claim(purge_type_suffix(&e.name));
    }

    let mut module = Module {
        name: name.to_string(),
        enums,
        ..Default::default()
    };

    for cname in types {
        register_type(&mut module, cname, &mut index, options);
    }

    for function in functions {
        add_function(&mut module, function, &mut index, options, diags)?;
    }

    for delegate in delegates {
        add_delegate(&mut module, delegate, &mut index, diags);
    }

    index.report_unused(diags);

    debug!(
        module = name,
        types = module.types.len(),
        functions = module.functions.len(),
        delegates = module.delegates.len(),
        "scanned module"
    );
    Ok(module)
}

/// Derive the module name from a path: "include/ta/iri.h" → "iri".
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// "ta_iri_t" → "ta_iri". Only the last suffix goes.
pub fn purge_type_suffix(name: &str) -> &str {
    name.strip_suffix(TYPE_SUFFIX).unwrap_or(name)
}

fn index_docstrings(buf: &str, diags: &mut Diagnostics) -> SymbolIndex {
    let mut index = SymbolIndex::default();
    for raw in find_docstrings(buf, diags) {
        let doc = parse_docstring(&raw.text, raw.start, diags);
        match doc.name.as_ref().map(QualifiedName::index_key) {
            Some(key) => {
                debug!("indexed {} from doc block at {}..{}", key, raw.start, raw.end);
                index.insert(key, raw.start, doc);
            }
            None => diags.push(Diagnostic::MissingName { offset: raw.start }),
        }
    }
    index
}

/// Types need no doc block; an undocumented one gets empty metadata.
fn register_type(
    module: &mut Module,
    cname: String,
    index: &mut SymbolIndex,
    options: &ScanOptions,
) {
    let purged = purge_type_suffix(&cname);
    let key = options.type_key(purged);
    let doc = index.claim(purged).map(DocFields::from).unwrap_or_default();

    debug!(module = %module.name, "registered type {} as {}", cname, key);
    module.types.insert(
        key,
        ClassType {
            cname,
            doc,
            ..Default::default()
        },
    );
}

fn add_function(
    module: &mut Module,
    function: CodeFunction,
    index: &mut SymbolIndex,
    options: &ScanOptions,
    diags: &mut Diagnostics,
) -> ScanResult<()> {
    let Some(doc) = index.claim(&function.name) else {
        diags.push(Diagnostic::UndocumentedFunction {
            name: function.name,
        });
        return Ok(());
    };

    let params = merge_params(function.params, doc, &function.name, diags);
    let merged = Function {
        name: doc
            .name
            .clone()
            .unwrap_or_else(|| QualifiedName::bare(&function.name)),
        cname: function.name,
        kind: FunctionKind::from_doc(doc.kind),
        rtype: function.rtype,
        params,
        doc: DocFields::from(doc),
    };

    let Some(class) = merged.name.class.as_deref() else {
        module.functions.push(merged);
        return Ok(());
    };

    let key = options.type_key(class);
    let Some(owner) = module.types.get_mut(&key) else {
        return Err(ScanError::UnknownClass {
            class: class.to_string(),
            function: merged.cname.clone(),
            known: module.types.keys().cloned().collect::<Vec<_>>().join(", "),
        });
    };
    attach_method(owner, merged, diags);
    Ok(())
}

/// Place a method by its kind. Constructor and destructor are single
/// slots; the last declaration wins.
fn attach_method(owner: &mut ClassType, method: Function, diags: &mut Diagnostics) {
    if method.name.name == RESERVED_METHOD {
        debug!("skipping reserved method {}", method.cname);
        return;
    }

    match method.kind {
        FunctionKind::Initializer => owner.initializers.push(method),
        FunctionKind::Constructor => {
            let current = method.cname.clone();
            if let Some(previous) = owner.constructor.replace(method) {
                diags.push(Diagnostic::DuplicateConstructor {
                    class: owner.cname.clone(),
                    previous: previous.cname,
                    current,
                });
            }
        }
        FunctionKind::Destructor => {
            let current = method.cname.clone();
            if let Some(previous) = owner.destructor.replace(method) {
                diags.push(Diagnostic::DuplicateDestructor {
                    class: owner.cname.clone(),
                    previous: previous.cname,
                    current,
                });
            }
        }
        FunctionKind::Getter | FunctionKind::Setter | FunctionKind::Method => {
            owner.methods.push(method)
        }
    }
}

fn add_delegate(
    module: &mut Module,
    delegate: CodeDelegate,
    index: &mut SymbolIndex,
    diags: &mut Diagnostics,
) {
    let name = purge_type_suffix(&delegate.cname).to_string();
    let Some(doc) = index.claim(&name) else {
        diags.push(Diagnostic::UndocumentedDelegate {
            name: format!("{}.{}", module.name, name),
        });
        return;
    };

    let params = merge_params(delegate.params, doc, &delegate.cname, diags);
    module.delegates.insert(
        name.clone(),
        Delegate {
            name,
            cname: delegate.cname,
            rtype: delegate.rtype,
            params,
            doc: DocFields::from(doc),
        },
    );
}

/// Copy `@param` modifiers and text onto code parameters of the same name.
/// Order and types stay as declared.
fn merge_params(
    mut params: Vec<Parameter>,
    doc: &Docstring,
    symbol: &str,
    diags: &mut Diagnostics,
) -> Vec<Parameter> {
    for param in params.iter_mut() {
        if let Parameter::Named(named) = param {
            if let Some(pdoc) = doc.param(&named.name) {
                named.modifiers = pdoc.modifiers.clone();
                named.doc = pdoc.doc.clone();
            }
        }
    }

    for pdoc in &doc.params {
        if !params.iter().any(|p| p.name() == Some(pdoc.name.as_str())) {
            diags.push(Diagnostic::UnknownParameter {
                function: symbol.to_string(),
                param: pdoc.name.clone(),
            });
        }
    }

    params
}
