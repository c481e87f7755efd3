//! JSON output: the module collection as consumed by the binding generator.

use crate::model::Module;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize modules. A negative `indent` gives compact output; otherwise
/// each nesting level is indented by `indent` spaces.
pub fn render_json(modules: &IndexMap<String, Module>, indent: i32) -> Result<String> {
    let mut buf = Vec::new();
    match usize::try_from(indent) {
        Ok(width) => {
            let pad = " ".repeat(width);
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(pad.as_bytes()));
            modules.serialize(&mut ser).context("failed to serialize modules")?;
        }
        Err(_) => serde_json::to_writer(&mut buf, modules).context("failed to serialize modules")?,
    }
    String::from_utf8(buf).context("serialized output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    fn sample() -> IndexMap<String, Module> {
        let mut modules = IndexMap::new();
        modules.insert(
            "log".to_string(),
            Module {
                name: "log".to_string(),
                enums: vec![Enum {
                    name: "ta_log_level_t".to_string(),
                    is_flags: true,
                    entries: vec!["TA_LOG_DEBUG".to_string()],
                }],
                ..Default::default()
            },
        );
        modules
    }

    #[test]
    fn compact_when_negative() {
        let out = render_json(&sample(), -1).unwrap();
        assert!(!out.contains('\n'));
        assert!(out.starts_with(r#"{"log":{"name":"log","enums":[{"name":"ta_log_level_t","isflags":true"#));
        assert!(out.contains(r#""types":{}"#));
        assert!(out.contains(r#""delegates":{}"#));
    }

    #[test]
    fn pretty_with_requested_width() {
        let out = render_json(&sample(), 2).unwrap();
        assert!(out.starts_with("{\n  \"log\": {\n    \"name\": \"log\""));
        let out = render_json(&sample(), 0).unwrap();
        assert!(out.starts_with("{\n\"log\": {\n\"name\": \"log\""));
    }
}
