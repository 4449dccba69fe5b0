//! Default-Value Renderer
//!
//! Renders a schema plus a base-case configuration into JSON text used to seed
//! default configurations. Unlike the merger it writes text directly:
//!
//! - a base key matching a field emits `"name":{"min":..,"max":..,"value":..,"datatype":..}`
//!   using the base value, not the field's stored default;
//! - a base key matching a leaf sub-message emits its field list under the
//!   message name, wrapped in `[...]` when the message is repeated;
//! - a base key matching a sub-message that has its own sub-messages recurses
//!   without a wrapping key.
//!
//! Trailing separators are removed by truncation before each close.

use crate::error::ConvertError;
use crate::schema::{Field, Message};
use crate::value::{type_name, Map, Value};
use tracing::trace;

/// Render `base` against `schema` as JSON text.
pub fn render_defaults(schema: &Message, base: &Map<String, Value>) -> Result<String, ConvertError> {
    if schema.is_empty() {
        return Err(ConvertError::InvalidArgument(format!(
            "schema '{}' has no fields or messages",
            schema.name
        )));
    }
    let mut out = String::with_capacity(256);
    out.push('{');
    render_level(schema, base, &schema.name, &mut out)?;
    trim_separator(&mut out);
    out.push('}');
    Ok(out)
}

fn render_level(
    schema: &Message,
    base: &Map<String, Value>,
    path: &str,
    out: &mut String,
) -> Result<(), ConvertError> {
    for (key, value) in base {
        if let Some(field) = schema.field(key) {
            render_field(field, value, out)?;
            continue;
        }
        let Some(message) = schema.message(key) else {
            trace!(path, key = %key, "no schema match for base key");
            continue;
        };
        let path = format!("{path}.{key}");

        if message.messages.is_empty() {
            push_key(&message.name, out)?;
            if message.is_repeated {
                out.push('[');
                for (index, item) in instances(value, &path)?.into_iter().enumerate() {
                    let item = expect_object(item, &format!("{path}[{index}]"))?;
                    out.push('{');
                    render_fields(message, item, out)?;
                    trim_separator(out);
                    out.push_str("},");
                }
                trim_separator(out);
                out.push_str("],");
            } else {
                let object = expect_object(value, &path)?;
                out.push('{');
                render_fields(message, object, out)?;
                trim_separator(out);
                out.push_str("},");
            }
        } else {
            for (index, item) in instances(value, &path)?.into_iter().enumerate() {
                let object = expect_object(item, &format!("{path}[{index}]"))?;
                render_level(message, object, &path, out)?;
            }
        }
    }
    Ok(())
}

/// Field entries only; keys naming sub-messages are not rendered at this level.
fn render_fields(
    message: &Message,
    object: &Map<String, Value>,
    out: &mut String,
) -> Result<(), ConvertError> {
    for (key, value) in object {
        if let Some(field) = message.field(key) {
            render_field(field, value, out)?;
        }
    }
    Ok(())
}

fn render_field(field: &Field, value: &Value, out: &mut String) -> Result<(), ConvertError> {
    push_key(&field.name, out)?;
    out.push_str("{\"min\":");
    out.push_str(&serde_json::to_string(&field.min)?);
    out.push_str(",\"max\":");
    out.push_str(&serde_json::to_string(&field.max)?);
    out.push_str(",\"value\":");
    out.push_str(&serde_json::to_string(value)?);
    out.push_str(",\"datatype\":");
    out.push_str(&serde_json::to_string(&field.data_type)?);
    out.push_str("},");
    Ok(())
}

fn push_key(name: &str, out: &mut String) -> Result<(), ConvertError> {
    out.push_str(&serde_json::to_string(name)?);
    out.push(':');
    Ok(())
}

/// An object is one instance; an array is a list of instances; null is none.
fn instances<'a>(value: &'a Value, path: &str) -> Result<Vec<&'a Value>, ConvertError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => Ok(vec![value]),
        Value::Array(items) => Ok(items.iter().collect()),
        other => Err(ConvertError::format(
            path,
            format!("expected an object or array, found {}", type_name(other)),
        )),
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ConvertError> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ConvertError::format(
            path,
            format!("expected an object, found {}", type_name(other)),
        )),
    }
}

fn trim_separator(out: &mut String) {
    if out.ends_with(',') {
        out.truncate(out.len() - 1);
    }
}
