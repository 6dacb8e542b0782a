//! Entry document templates
//!
//! A deliberately small interpolation syntax:
//! - `{{.}}` renders the whole value bag
//! - `{{.Title}}`, `{{ .user.name }}` walk object fields
//! - `{{/* note */}}` is a comment
//! - `{{- ` and ` -}}` trim the whitespace next to the action
//!
//! Scalars are HTML-escaped. Objects and arrays render as JSON with `<`, `>`
//! and `&` escaped, so they can be dropped into a `<script>` block as-is.

use crate::error::TemplateError;
use serde_json::Value;

const NO_VALUE: &str = "<no value>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Field { path: Vec<String>, offset: usize },
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source. Any action other than a field reference or a
    /// comment is rejected.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut nodes = Vec::new();
        let mut pos = 0;
        let mut trim_next = false;

        while let Some(found) = source[pos..].find("{{") {
            let open = pos + found;
            let mut text = &source[pos..open];
            if trim_next {
                text = text.trim_start();
            }

            let mut inner_start = open + 2;
            if has_trim_marker_left(&source[inner_start..]) {
                text = text.trim_end();
                inner_start += 1;
            }
            push_text(&mut nodes, text);

            let close = find_close(source, inner_start)
                .ok_or_else(|| TemplateError::at(open, "unclosed action"))?;
            let mut inner_end = close;
            trim_next = has_trim_marker_right(&source[inner_start..close]);
            if trim_next {
                inner_end -= 1;
            }

            if let Some(node) = parse_action(source[inner_start..inner_end].trim(), open)? {
                nodes.push(node);
            }
            pos = close + 2;
        }

        let mut tail = &source[pos..];
        if trim_next {
            tail = tail.trim_start();
        }
        push_text(&mut nodes, tail);

        Ok(Self { nodes })
    }

    /// Render against a value bag
    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        self.render_into(data, &mut out)?;
        Ok(out)
    }

    /// Render against a value bag, appending to `out`.
    ///
    /// On error `out` holds whatever was rendered before the failing action.
    pub fn render_into(&self, data: &Value, out: &mut String) -> Result<(), TemplateError> {
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Field { path, offset } => match lookup(data, path, *offset)? {
                    Some(value) => write_value(value, out),
                    None => out.push_str(NO_VALUE),
                },
            }
        }
        Ok(())
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// `{{- ` trims only when the dash is followed by whitespace
fn has_trim_marker_left(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn has_trim_marker_right(inner: &str) -> bool {
    let mut chars = inner.chars().rev();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

/// Position of the `}}` closing the action whose body starts at `start`.
/// Comment bodies may contain `}}`.
fn find_close(source: &str, start: usize) -> Option<usize> {
    let body = &source[start..];
    let search_from = if body.trim_start().starts_with("/*") {
        let comment_end = body.find("*/")?;
        start + comment_end + 2
    } else {
        start
    };
    source[search_from..].find("}}").map(|i| search_from + i)
}

fn parse_action(action: &str, offset: usize) -> Result<Option<Node>, TemplateError> {
    if action.starts_with("/*") {
        if action.ends_with("*/") {
            return Ok(None);
        }
        return Err(TemplateError::at(offset, "comment ends before closing delimiter"));
    }

    let Some(fields) = action.strip_prefix('.') else {
        return Err(TemplateError::at(
            offset,
            format!("unsupported action {{{{{action}}}}}"),
        ));
    };

    if fields.is_empty() {
        return Ok(Some(Node::Field {
            path: Vec::new(),
            offset,
        }));
    }

    let path = fields
        .split('.')
        .map(|name| {
            let valid = !name.is_empty()
                && name.chars().all(|c| c.is_alphanumeric() || c == '_');
            if valid {
                Ok(name.to_string())
            } else {
                Err(TemplateError::at(
                    offset,
                    format!("bad field reference in {{{{{action}}}}}"),
                ))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Node::Field { path, offset }))
}

/// Walk `path` through `data`.
///
/// A missing key, or any field below `null` or a missing key, yields `None`.
fn lookup<'a>(
    data: &'a Value,
    path: &[String],
    offset: usize,
) -> Result<Option<&'a Value>, TemplateError> {
    let mut current = Some(data);
    for name in path {
        current = match current {
            Some(Value::Object(map)) => map.get(name),
            None | Some(Value::Null) => return Ok(None),
            Some(other) => {
                return Err(TemplateError::at(
                    offset,
                    format!("can't evaluate field {name} in type {}", type_name(other)),
                ));
            }
        };
    }
    Ok(current)
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str(NO_VALUE),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => escape_html(s, out),
        Value::Array(_) | Value::Object(_) => escape_json(&value.to_string(), out),
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Markup-significant characters inside JSON become unicode escapes
fn escape_json(json: &str, out: &mut String) {
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
}
