//! The compiled template program and its interpreter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Renderer;

/// One instruction of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Literal output text.
    Text(String),
    /// Interpolate the value at a dotted path in the data record.
    Var {
        /// Lookup path, one entry per `.`-separated key.
        path: Vec<String>,
        /// When false, the value is HTML-escaped on output.
        raw: bool,
    },
}

/// A compiled template: a flat op sequence produced by the parser, with all
/// partial inclusions already expanded.
///
/// This is the persisted artifact payload. It contains only data, so loading
/// an artifact never executes anything beyond this interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    /// Wraps an op sequence into a program.
    pub fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// Executes the program against a data record.
    pub fn run(&self, data: &Value) -> String {
        let mut out = String::new();
        for op in &self.ops {
            match op {
                Op::Text(text) => out.push_str(text),
                Op::Var { path, raw } => {
                    let value = lookup(data, path).map(scalar_text).unwrap_or_default();
                    if *raw {
                        out.push_str(&value);
                    } else {
                        escape_html_into(&mut out, &value);
                    }
                }
            }
        }
        out
    }
}

impl Renderer for Program {
    fn render(&self, data: &Value) -> String {
        self.run(data)
    }
}

/// Resolves a dotted path through nested objects.
fn lookup<'a>(data: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = data;
    for key in path {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Text form of a scalar value. Null, arrays, and objects render as empty.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Appends `value` to `out` with HTML metacharacters escaped.
fn escape_html_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_only_program() {
        let p = Program::new(vec![Op::Text("static".to_string())]);
        assert_eq!(p.run(&json!({})), "static");
    }

    #[test]
    fn number_and_bool_values() {
        let p = Program::new(vec![
            Op::Var {
                path: vec!["n".to_string()],
                raw: false,
            },
            Op::Text("/".to_string()),
            Op::Var {
                path: vec!["b".to_string()],
                raw: false,
            },
        ]);
        assert_eq!(p.run(&json!({"n": 42, "b": true})), "42/true");
    }

    #[test]
    fn null_renders_empty() {
        let p = Program::new(vec![Op::Var {
            path: vec!["x".to_string()],
            raw: false,
        }]);
        assert_eq!(p.run(&json!({"x": null})), "");
    }

    #[test]
    fn array_and_object_render_empty() {
        let p = Program::new(vec![Op::Var {
            path: vec!["x".to_string()],
            raw: false,
        }]);
        assert_eq!(p.run(&json!({"x": [1, 2]})), "");
        assert_eq!(p.run(&json!({"x": {"k": 1}})), "");
    }

    #[test]
    fn lookup_through_non_object_is_empty() {
        let p = Program::new(vec![Op::Var {
            path: vec!["a".to_string(), "b".to_string()],
            raw: false,
        }]);
        assert_eq!(p.run(&json!({"a": "scalar"})), "");
    }

    #[test]
    fn escaping_covers_quotes() {
        let p = Program::new(vec![Op::Var {
            path: vec!["q".to_string()],
            raw: false,
        }]);
        assert_eq!(p.run(&json!({"q": "\"'"})), "&quot;&#x27;");
    }

    #[test]
    fn serde_roundtrip_preserves_program() {
        let p = Program::new(vec![
            Op::Text("Hello ".to_string()),
            Op::Var {
                path: vec!["name".to_string()],
                raw: true,
            },
        ]);
        let bytes = bincode::serde::encode_to_vec(&p, bincode::config::standard()).unwrap();
        let (back, _): (Program, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.run(&json!({"name": "x"})), "Hello x");
    }
}
