//! Scanner for the Handlebars-subset template syntax.
//!
//! Produces a flat [`Program`] of text and variable ops. Partial inclusions
//! are resolved against the supplied partial map and expanded inline at
//! compile time, so the resulting program is self-contained.

use crate::error::CompileError;
use crate::program::{Op, Program};
use crate::PartialMap;

/// Parses template source into a compiled program.
pub fn parse(source: &str, partials: &PartialMap) -> Result<Program, CompileError> {
    let mut ops = Vec::new();
    let mut stack = Vec::new();
    parse_into(source, partials, &mut stack, &mut ops)?;
    Ok(Program::new(ops))
}

/// Recursive worker: appends ops for `source`, expanding partials inline.
///
/// `stack` holds the names of partials currently being expanded; re-entering
/// one of them is an inclusion cycle.
fn parse_into(
    source: &str,
    partials: &PartialMap,
    stack: &mut Vec<String>,
    ops: &mut Vec<Op>,
) -> Result<(), CompileError> {
    let mut rest = source;
    let mut offset = 0;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            ops.push(Op::Text(rest[..open].to_string()));
        }
        let tag_offset = offset + open;
        let tail = &rest[open..];

        let consumed = if let Some(raw) = tail.strip_prefix("{{{") {
            let close = raw.find("}}}").ok_or_else(|| CompileError::Syntax {
                message: "unclosed '{{{'".to_string(),
                offset: tag_offset,
            })?;
            ops.push(Op::Var {
                path: parse_path(&raw[..close], tag_offset)?,
                raw: true,
            });
            3 + close + 3
        } else if let Some(comment) = tail.strip_prefix("{{!") {
            let close = comment.find("}}").ok_or_else(|| CompileError::Syntax {
                message: "unclosed comment".to_string(),
                offset: tag_offset,
            })?;
            3 + close + 2
        } else if let Some(partial) = tail.strip_prefix("{{>") {
            let close = partial.find("}}").ok_or_else(|| CompileError::Syntax {
                message: "unclosed partial tag".to_string(),
                offset: tag_offset,
            })?;
            let name = partial[..close].trim();
            if name.is_empty() {
                return Err(CompileError::Syntax {
                    message: "partial tag without a name".to_string(),
                    offset: tag_offset,
                });
            }
            expand_partial(name, partials, stack, ops)?;
            3 + close + 2
        } else {
            let inner = &tail[2..];
            let close = inner.find("}}").ok_or_else(|| CompileError::Syntax {
                message: "unclosed '{{'".to_string(),
                offset: tag_offset,
            })?;
            ops.push(Op::Var {
                path: parse_path(&inner[..close], tag_offset)?,
                raw: false,
            });
            2 + close + 2
        };

        offset += open + consumed;
        rest = &rest[open + consumed..];
    }

    if !rest.is_empty() {
        ops.push(Op::Text(rest.to_string()));
    }
    Ok(())
}

/// Expands a `{{> name}}` inclusion by compiling the partial's source inline.
fn expand_partial(
    name: &str,
    partials: &PartialMap,
    stack: &mut Vec<String>,
    ops: &mut Vec<Op>,
) -> Result<(), CompileError> {
    if stack.iter().any(|active| active == name) {
        return Err(CompileError::PartialCycle {
            name: name.to_string(),
        });
    }
    let source = partials.get(name).ok_or_else(|| CompileError::UnknownPartial {
        name: name.to_string(),
    })?;
    stack.push(name.to_string());
    parse_into(source, partials, stack, ops)?;
    stack.pop();
    Ok(())
}

/// Parses the dotted path inside a variable tag.
fn parse_path(expr: &str, offset: usize) -> Result<Vec<String>, CompileError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(CompileError::Syntax {
            message: "empty expression".to_string(),
            offset,
        });
    }
    let mut path = Vec::new();
    for key in expr.split('.') {
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(CompileError::Syntax {
                message: format!("malformed expression '{expr}'"),
                offset,
            });
        }
        path.push(key.to_string());
    }
    Ok(path)
}
