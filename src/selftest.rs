//! `--run-tests`: runs the embedded usage examples against this binary's own
//! scanner and reports each one.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ScanError;
use crate::model::*;
use crate::parser::builder::{scan_source, ScanOptions};
use crate::parser::code::{clear_params, find_delegates, find_enums, find_functions};
use crate::parser::comments::{find_docstrings, strip_spaces};
use crate::parser::tags::{parse_docstring, tag_name, tag_param, tag_return};
use std::fmt::Debug;

type Check = fn() -> Result<(), String>;

const EXAMPLES: &[(&str, Check)] = &[
    ("find_docstrings: single block", docstring_single),
    ("find_docstrings: ordinary comment", docstring_ordinary),
    ("strip_spaces", spaces),
    ("clear_params: typed list", params_typed),
    ("clear_params: void", params_void),
    ("tag_name: qualified", name_qualified),
    ("tag_param: modifiers and doc", param_modifiers),
    ("tag_return: container and plain", return_forms),
    ("parse_docstring: reparse is stable", docstring_reparse),
    ("find_enums: bit flags", enum_flags),
    ("find_functions: prototype", function_prototype),
    ("find_delegates: function pointer", delegate_pointer),
    ("scan: class, constructor and free function", scan_scenario),
    ("scan: unknown owner is fatal", scan_unknown_owner),
    ("scan: undocumented function is dropped", scan_undocumented),
];

const SCENARIO: &str = r#"
/**
 * @name: ta_iri
 * @type: class
 */
typedef struct _ta_iri ta_iri_t;

/**
 * @name: ta_iri::new
 * @type: constructor
 */
ta_iri_t *ta_iri_new (void);

/**
 * @name: ta_iri::to_string
 * @type: method
 * @return: char *
 */
char *ta_iri_to_string (ta_iri_t *iri);

/**
 * @name: ta_log_info
 */
void ta_log_info (const char *fmt, ...);
"#;

/// Run every example, print one line each. Returns the failure count.
pub fn run() -> usize {
    let mut failed = 0;
    for (name, check) in EXAMPLES {
        match check() {
            Ok(()) => println!("ok      {}", name),
            Err(msg) => {
                failed += 1;
                println!("FAILED  {}: {}", name, msg);
            }
        }
    }
    println!(
        "\n{} passed, {} failed",
        EXAMPLES.len() - failed,
        failed
    );
    failed
}

fn expect_eq<T: PartialEq + Debug>(got: T, want: T) -> Result<(), String> {
    if got == want {
        Ok(())
    } else {
        Err(format!("expected {:?}, got {:?}", want, got))
    }
}

fn docstrings(buf: &str) -> Vec<String> {
    let mut diags = Diagnostics::default();
    find_docstrings(buf, &mut diags)
        .into_iter()
        .map(|c| c.text)
        .collect()
}

fn docstring_single() -> Result<(), String> {
    expect_eq(
        docstrings("we have a docstring here /** blah blah blah */"),
        vec![" blah blah blah ".to_string()],
    )
}

fn docstring_ordinary() -> Result<(), String> {
    expect_eq(docstrings("/* blah blah */ test test test"), Vec::new())
}

fn spaces() -> Result<(), String> {
    expect_eq(
        strip_spaces("ta_atom_content_t          *").as_str(),
        "ta_atom_content_t *",
    )
}

fn params_typed() -> Result<(), String> {
    let params = clear_params("const char *p1, int p2, ta_iri_t *iri").map_err(|e| e.to_string())?;
    expect_eq(
        params,
        vec![
            Parameter::named("const char *", "p1"),
            Parameter::named("int", "p2"),
            Parameter::named("ta_iri_t *", "iri"),
        ],
    )
}

fn params_void() -> Result<(), String> {
    expect_eq(clear_params("void").map_err(|e| e.to_string())?, Vec::new())?;
    expect_eq(clear_params(" void ").map_err(|e| e.to_string())?, Vec::new())
}

fn name_qualified() -> Result<(), String> {
    expect_eq(
        tag_name(" ta_log::info"),
        QualifiedName {
            name: "info".to_string(),
            class: Some("ta_log".to_string()),
        },
    )
}

fn param_modifiers() -> Result<(), String> {
    expect_eq(
        tag_param(" type (optional): Content mime type"),
        ParamDoc {
            name: "type".to_string(),
            modifiers: vec!["optional".to_string()],
            doc: "Content mime type".to_string(),
        },
    )
}

fn return_forms() -> Result<(), String> {
    expect_eq(
        tag_return(" ta_list (ta_atom_link)"),
        ReturnDoc {
            ty: "ta_list".to_string(),
            containing: Some("ta_atom_link".to_string()),
        },
    )?;
    expect_eq(
        tag_return(" bool"),
        ReturnDoc {
            ty: "bool".to_string(),
            containing: None,
        },
    )
}

fn docstring_reparse() -> Result<(), String> {
    let mut diags = Diagnostics::default();
    let text = "\n * @name: ta_atom::load\n * @param: path (optional): File path\n * @raise: TA_ATOM_LOAD_ERROR\n *\n * Loads a feed.\n ";
    let first = parse_docstring(text, 0, &mut diags);
    let second = parse_docstring(&first.to_string(), 0, &mut diags);
    expect_eq(second, first)
}

fn enum_flags() -> Result<(), String> {
    let enums = find_enums(&strip_spaces("enum {\n  F1 = 1 << 1,\n  F2 = 1 << 2\n} myflags;"));
    expect_eq(
        enums,
        vec![Enum {
            name: "myflags".to_string(),
            is_flags: true,
            entries: vec!["F1".to_string(), "F2".to_string()],
        }],
    )
}

fn function_prototype() -> Result<(), String> {
    let functions = find_functions("int my_func (const char *param1, int param2, void *param3);")
        .map_err(|e| e.to_string())?;
    let first = functions.first().ok_or("no function found")?;
    expect_eq(first.name.as_str(), "my_func")?;
    expect_eq(first.rtype.as_str(), "int")?;
    expect_eq(first.params.len(), 3)
}

fn delegate_pointer() -> Result<(), String> {
    let code = "typedef int *(*ta_list_cmp_func_t) (void *a, void *b);";
    let delegates = find_delegates(code).map_err(|e| e.to_string())?;
    let first = delegates.first().ok_or("no delegate found")?;
    expect_eq(first.cname.as_str(), "ta_list_cmp_func_t")?;
    expect_eq(first.params.len(), 2)?;
    expect_eq(find_functions(code).map_err(|e| e.to_string())?.len(), 0)
}

fn scan_scenario() -> Result<(), String> {
    let options = ScanOptions {
        lib_prefix: Some("ta_".to_string()),
    };
    let mut diags = Diagnostics::default();
    let module = scan_source("iri", SCENARIO, &options, &mut diags).map_err(|e| e.to_string())?;
    let iri = module.types.get("iri").ok_or("types.iri missing")?;
    expect_eq(
        iri.constructor.as_ref().map(|f| f.cname.as_str()),
        Some("ta_iri_new"),
    )?;
    expect_eq(
        iri.methods.iter().map(|f| f.cname.as_str()).collect::<Vec<_>>(),
        vec!["ta_iri_to_string"],
    )?;
    expect_eq(
        module.functions.iter().map(|f| f.cname.as_str()).collect::<Vec<_>>(),
        vec!["ta_log_info"],
    )
}

fn scan_unknown_owner() -> Result<(), String> {
    let mut diags = Diagnostics::default();
    let buf = "/** @name: ta_ghost::boo */\nvoid ta_ghost_boo (int a);";
    match scan_source("ghost", buf, &ScanOptions::default(), &mut diags) {
        Err(ScanError::UnknownClass { .. }) => Ok(()),
        other => Err(format!("expected an unknown class error, got {:?}", other)),
    }
}

fn scan_undocumented() -> Result<(), String> {
    let mut diags = Diagnostics::default();
    let module = scan_source("x", "int ta_hidden (int a);", &ScanOptions::default(), &mut diags)
        .map_err(|e| e.to_string())?;
    expect_eq(module.functions.len(), 0)?;
    expect_eq(
        diags.into_vec(),
        vec![Diagnostic::UndocumentedFunction {
            name: "ta_hidden".to_string(),
        }],
    )
}
