// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Placeholder substitution for pipeline description templates.
//!
//! Placeholders name a top-level key of the render context, optionally
//! followed by index keys into nested objects or arrays:
//!
//! ```text
//! urisourcebin uri={source[uri]} ! detect model={models[person][1][network]} threshold={parameters[threshold]}
//! ```
//!
//! `{{` and `}}` produce literal braces. Strings are substituted verbatim and
//! any other JSON value is substituted in its compact JSON form. A `null` value
//! counts as missing.
//!
//! # Example
//! ```
//! use analytics_pipeline::pipeline::render;
//! use serde_json::json;
//!
//! let context = json!({"parameters": {"threshold": 0.5}});
//! let rendered = render("detect threshold={parameters[threshold]}", &context).unwrap();
//! assert_eq!(rendered, "detect threshold=0.5");
//! ```

use crate::errors::RenderError;
use serde_json::Value;

/// Render `template` against `context`.
pub fn render(template: &str, context: &Value) -> Result<String, RenderError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    output.push('{');
                    continue;
                }

                let mut field = String::new();
                let mut closed = false;
                for (inner_position, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(RenderError::Malformed {
                                position: inner_position,
                                reason: "nested '{' inside placeholder".to_string(),
                            });
                        }
                        other => field.push(other),
                    }
                }
                if !closed {
                    return Err(RenderError::Malformed {
                        position,
                        reason: "unclosed '{'".to_string(),
                    });
                }

                let value = lookup(&field, context, position)?;
                push_value(&mut output, value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    output.push('}');
                } else {
                    return Err(RenderError::Malformed {
                        position,
                        reason: "single '}' encountered".to_string(),
                    });
                }
            }
            other => output.push(other),
        }
    }

    Ok(output)
}

/// Resolve a `name[key][key]` field against the context.
fn lookup<'a>(field: &str, context: &'a Value, position: usize) -> Result<&'a Value, RenderError> {
    let field = field.trim();
    let (name, mut rest) = match field.find('[') {
        Some(index) => field.split_at(index),
        None => (field, ""),
    };

    if name.is_empty() {
        return Err(RenderError::Malformed {
            position,
            reason: "placeholder without a name".to_string(),
        });
    }
    if name.contains(|c: char| c == ':' || c == '!' || c == ']') {
        return Err(RenderError::Malformed {
            position,
            reason: format!("unsupported placeholder syntax '{}'", field),
        });
    }

    let missing = || RenderError::MissingValue {
        placeholder: field.to_string(),
    };

    let mut current = context.get(name).ok_or_else(missing)?;
    while !rest.is_empty() {
        let Some(after_open) = rest.strip_prefix('[') else {
            return Err(RenderError::Malformed {
                position,
                reason: format!("unexpected text in placeholder '{}'", field),
            });
        };
        let Some(close) = after_open.find(']') else {
            return Err(RenderError::Malformed {
                position,
                reason: format!("unclosed '[' in placeholder '{}'", field),
            });
        };
        let key = &after_open[..close];
        rest = &after_open[close + 1..];

        current = match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
        .ok_or_else(missing)?;
    }

    if current.is_null() {
        return Err(missing());
    }
    Ok(current)
}

fn push_value(output: &mut String, value: &Value) {
    match value {
        Value::String(s) => output.push_str(s),
        other => output.push_str(&other.to_string()),
    }
}
