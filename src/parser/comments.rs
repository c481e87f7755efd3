//! Comment handling: doc block discovery and comment stripping.
//!
//! Purely lexical. Doc blocks open with `/**` and close with `*/`; an
//! ordinary block comment opens with `/*`. `/**/` is an ordinary (empty)
//! comment.

use crate::diagnostics::{Diagnostic, Diagnostics};

const DOC_OPEN: &str = "/**";
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const LINE_OPEN: &str = "//";

/// One `/** ... */` block found in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    /// Offset of the opening marker
    pub start: usize,
    /// Offset just past the closing marker (or end of input)
    pub end: usize,
    /// Text between the markers
    pub text: String,
}

struct Span {
    start: usize,
    end: usize,
    body_start: usize,
    body_end: usize,
    doc: bool,
    terminated: bool,
}

/// Sequential scan for block and line comments.
fn comment_spans(buf: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(rel) = buf[pos..].find('/') {
        let start = pos + rel;
        let rest = &buf[start..];

        if rest.starts_with(BLOCK_OPEN) {
            let doc = rest.starts_with(DOC_OPEN) && !rest.starts_with("/**/");
            let body_start = start + if doc { DOC_OPEN.len() } else { BLOCK_OPEN.len() };
            match buf[body_start..].find(BLOCK_CLOSE) {
                Some(close) => {
                    let body_end = body_start + close;
                    spans.push(Span {
                        start,
                        end: body_end + BLOCK_CLOSE.len(),
                        body_start,
                        body_end,
                        doc,
                        terminated: true,
                    });
                    pos = body_end + BLOCK_CLOSE.len();
                }
                None => {
                    spans.push(Span {
                        start,
                        end: buf.len(),
                        body_start,
                        body_end: buf.len(),
                        doc,
                        terminated: false,
                    });
                    break;
                }
            }
        } else if rest.starts_with(LINE_OPEN) {
            let end = rest.find('\n').map_or(buf.len(), |n| start + n);
            spans.push(Span {
                start,
                end,
                body_start: start + LINE_OPEN.len(),
                body_end: end,
                doc: false,
                terminated: true,
            });
            pos = end;
        } else {
            pos = start + 1;
        }
    }

    spans
}

/// Find every doc block, in order, with its markers excluded.
///
/// An unterminated block is truncated at end of input and reported.
pub fn find_docstrings(buf: &str, diags: &mut Diagnostics) -> Vec<RawComment> {
    let mut found = Vec::new();
    for span in comment_spans(buf) {
        if !span.terminated {
            diags.push(Diagnostic::UnterminatedComment { offset: span.start });
        }
        if span.doc {
            found.push(RawComment {
                start: span.start,
                end: span.end,
                text: buf[span.body_start..span.body_end].to_string(),
            });
        }
    }
    found
}

/// Remove comments from code, each replaced by a single space.
///
/// Doc blocks go too: their content is parsed from the original text.
pub fn strip_comments(buf: &str) -> String {
    let mut out = String::with_capacity(buf.len());
    let mut last = 0;
    for span in comment_spans(buf) {
        out.push_str(&buf[last..span.start]);
        out.push(' ');
        last = span.end;
    }
    out.push_str(&buf[last..]);
    out
}

/// Blank out preprocessor lines, `\` continuations included. Line breaks
/// stay so that later lines keep their place. Expects comment-free text.
pub fn strip_directives(buf: &str) -> String {
    let mut out = String::with_capacity(buf.len());
    let mut continued = false;
    for line in buf.split_inclusive('\n') {
        if continued || line.trim_start().starts_with('#') {
            continued = line.trim_end().ends_with('\\');
            if line.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Collapse every whitespace run (newlines included) to one space.
pub fn strip_spaces(buf: &str) -> String {
    buf.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buf: &str) -> Vec<String> {
        let mut diags = Diagnostics::default();
        find_docstrings(buf, &mut diags)
            .into_iter()
            .map(|c| c.text)
            .collect()
    }

    #[test]
    fn single_docstring() {
        assert_eq!(
            texts("we have a docstring here /** blah blah blah */"),
            vec![" blah blah blah "]
        );
    }

    #[test]
    fn multiline_docstring() {
        let buf = "/** Another docstring\n * now with multiple lines\n * as you see */\ncode code code";
        assert_eq!(
            texts(buf),
            vec![" Another docstring\n * now with multiple lines\n * as you see "]
        );
    }

    #[test]
    fn several_docstrings_in_order() {
        assert_eq!(
            texts("/** first ds */ blah /** second ds */ blah blah"),
            vec![" first ds ", " second ds "]
        );
    }

    #[test]
    fn ordinary_comments_are_not_docstrings() {
        assert!(texts("/* blah blah */ test test test").is_empty());
        assert!(texts("int a; /**/ int b;").is_empty());
        assert!(texts("// see /** this */\nint a;").is_empty());
    }

    #[test]
    fn offsets_point_at_markers() {
        let buf = "int a; /** doc */ int b;";
        let mut diags = Diagnostics::default();
        let found = find_docstrings(buf, &mut diags);
        assert_eq!(&buf[found[0].start..found[0].end], "/** doc */");
    }

    #[test]
    fn unterminated_docstring_is_truncated_with_warning() {
        let mut diags = Diagnostics::default();
        let found = find_docstrings("int a; /** never closed", &mut diags);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, " never closed");
        assert_eq!(
            diags.into_vec(),
            vec![Diagnostic::UnterminatedComment { offset: 7 }]
        );
    }

    #[test]
    fn strip_comments_removes_all_comment_kinds() {
        let buf = "\n/* blah blah */\nthis is a test buffer\n/* blah\n   multi line comment\n */\n1, 2, 3, ...\n";
        assert_eq!(
            strip_comments(buf),
            "\n \nthis is a test buffer\n \n1, 2, 3, ...\n"
        );
        assert_eq!(strip_comments("int a; // trailing\nint b;"), "int a;  \nint b;");
        assert_eq!(strip_comments("/** doc */int a;"), " int a;");
    }

    #[test]
    fn strip_comments_keeps_tokens_apart() {
        assert_eq!(strip_spaces(&strip_comments("int/* x */a;")), "int a;");
    }

    #[test]
    fn directives_are_blanked() {
        let buf = "#ifndef TA_IRI_H\n#define ta_iri_cast(o) \\\n    ((ta_iri_t *) (o))\nint ta_iri_len (ta_iri_t *iri);\n#endif\n";
        assert_eq!(strip_directives(buf), "\n\n\nint ta_iri_len (ta_iri_t *iri);\n\n");
    }

    #[test]
    fn hash_inside_code_is_kept() {
        assert_eq!(strip_directives("char c = '#';\n"), "char c = '#';\n");
    }

    #[test]
    fn strip_spaces_collapses_runs() {
        assert_eq!(
            strip_spaces("ta_atom_content_t          *"),
            "ta_atom_content_t *"
        );
        assert_eq!(strip_spaces("  a\n\t b  "), "a b");
    }
}
