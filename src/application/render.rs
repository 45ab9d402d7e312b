//! Structured output: JSON and field templates
//!
//! Templates use `{{.Field}}` actions resolved against the record's
//! JSON form, e.g. `{{.SecretID}}` or `{{ .Nested.Key }}`. `{{.}}`
//! prints the whole record.

use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::format::bracket_list;

const ACTION_PATTERN: &str = r"\{\{\s*(.*?)\s*\}\}";

/// Rendered in place of a null field.
pub const NO_VALUE: &str = "<no value>";

/// Render a record as JSON (`json`) or through a template (`template`).
///
/// Exactly one of the two must be requested.
pub fn format_output<T>(json: bool, template: &str, record: &T) -> ApplicationResult<String>
where
    T: Serialize + ?Sized,
{
    match (json, template.is_empty()) {
        (true, false) => Err(ApplicationError::render(
            "both json and template formatting are not allowed",
        )),
        (true, true) => to_indented_json(record),
        (false, false) => {
            let value = serde_json::to_value(record)
                .map_err(|e| ApplicationError::render(format!("JSON encoding failed: {e}")))?;
            render_template(template, &value)
        }
        (false, true) => Err(ApplicationError::render("no output format requested")),
    }
}

/// Pretty JSON with four-space indentation.
fn to_indented_json<T>(record: &T) -> ApplicationResult<String>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record
        .serialize(&mut ser)
        .map_err(|e| ApplicationError::render(format!("JSON encoding failed: {e}")))?;
    String::from_utf8(buf)
        .map_err(|e| ApplicationError::render(format!("JSON encoding failed: {e}")))
}

/// Substitute every `{{ ... }}` action in `template` with values from `root`.
pub fn render_template(template: &str, root: &Value) -> ApplicationResult<String> {
    let pattern = Regex::new(ACTION_PATTERN)
        .map_err(|e| ApplicationError::render(format!("invalid action pattern: {e}")))?;

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in pattern.captures_iter(template) {
        let Some(action) = caps.get(0) else {
            continue;
        };
        push_literal(&mut out, &template[last..action.start()])?;

        let expr = caps.get(1).map_or("", |m| m.as_str());
        debug!("render_template: resolving {:?}", expr);
        out.push_str(&display_value(resolve(root, expr)?));
        last = action.end();
    }
    push_literal(&mut out, &template[last..])?;

    Ok(out)
}

fn push_literal(out: &mut String, literal: &str) -> ApplicationResult<()> {
    if literal.contains("{{") {
        return Err(ApplicationError::render(format!(
            "template: unclosed action in {literal:?}"
        )));
    }
    out.push_str(literal);
    Ok(())
}

fn resolve<'a>(root: &'a Value, expr: &str) -> ApplicationResult<&'a Value> {
    if expr == "." {
        return Ok(root);
    }
    let Some(path) = expr.strip_prefix('.') else {
        return Err(ApplicationError::render(format!(
            "template: unsupported action {{{{{expr}}}}}"
        )));
    };

    let mut current = root;
    for field in path.split('.') {
        if field.is_empty() {
            return Err(ApplicationError::render(format!(
                "template: malformed field path {expr:?}"
            )));
        }
        current = match current {
            Value::Object(map) => map.get(field).ok_or_else(|| {
                ApplicationError::render(format!("template: can't evaluate field {field}"))
            })?,
            _ => {
                return Err(ApplicationError::render(format!(
                    "template: can't evaluate field {field} in non-object value"
                )))
            }
        };
    }
    Ok(current)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NO_VALUE.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            bracket_list(&items)
        }
        Value::Object(_) => value.to_string(),
    }
}
