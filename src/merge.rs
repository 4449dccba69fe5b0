//! Schema-Data Merger
//!
//! Walks a schema [`Message`] and a parsed configuration object in lock-step,
//! matching names case-insensitively, and produces the annotated
//! [`MergedNode`] tree consumed by configuration UIs.
//!
//! Ordering differs by level: a schema level (the root, or a singular message
//! reached from it) lists fields then sub-messages in declaration order, with
//! schema defaults filling missing keys. A repeated-message instance follows the
//! data's own key order and only contains keys present in the data.

mod node;

pub use node::{any_node, reindex, MergedNode, MESSAGE_DATA_TYPE};

use crate::error::ConvertError;
use crate::schema::Message;
use crate::value::{get_ci, type_name, Map, Value};
use tracing::{debug, trace};

/// Merge `data` against `schema`.
///
/// Fails with `InvalidArgument` for an empty schema and with `Format` when a
/// message entry holds something other than the expected object/array shape.
pub fn merge(schema: &Message, data: &Map<String, Value>) -> Result<Vec<MergedNode>, ConvertError> {
    if schema.is_empty() {
        return Err(ConvertError::InvalidArgument(format!(
            "schema '{}' has no fields or messages",
            schema.name
        )));
    }
    debug!(schema = %schema.name, keys = data.len(), "merging configuration");
    merge_level(schema, data, &schema.name)
}

fn merge_level(
    schema: &Message,
    data: &Map<String, Value>,
    path: &str,
) -> Result<Vec<MergedNode>, ConvertError> {
    let mut nodes = Vec::with_capacity(schema.fields.len() + schema.messages.len());

    for field in &schema.fields {
        let value = match get_ci(data, &field.name) {
            Some((_, value)) => value.clone(),
            None => field.default_value.clone(),
        };
        nodes.push(MergedNode::from_field(field, value));
    }

    for message in &schema.messages {
        let path = child_path(path, &message.name);
        let entry = get_ci(data, &message.name).map(|(_, v)| v);
        let mut node = MergedNode::from_message(message);

        if message.is_repeated {
            match entry {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) => {
                    node.arrays = resolve_array(message, items, &path)?;
                }
                Some(other) => {
                    return Err(ConvertError::format(
                        path,
                        format!("expected an array of objects, found {}", type_name(other)),
                    ));
                }
            }
        } else {
            let empty = Map::new();
            let object = match entry {
                None | Some(Value::Null) => &empty,
                Some(Value::Object(object)) => object,
                Some(other) => {
                    return Err(ConvertError::format(
                        path,
                        format!("expected an object, found {}", type_name(other)),
                    ));
                }
            };
            node.fields = merge_level(message, object, &path)?;
        }
        nodes.push(node);
    }

    Ok(reindex(nodes))
}

fn resolve_array(
    message: &Message,
    items: &[Value],
    path: &str,
) -> Result<Vec<Vec<MergedNode>>, ConvertError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = format!("{path}[{index}]");
            match item {
                Value::Object(object) => resolve_instance(message, object, &path),
                other => Err(ConvertError::format(
                    path,
                    format!("expected an object, found {}", type_name(other)),
                )),
            }
        })
        .collect()
}

/// Resolve one instance of a repeated message, in the instance's key order.
fn resolve_instance(
    message: &Message,
    instance: &Map<String, Value>,
    path: &str,
) -> Result<Vec<MergedNode>, ConvertError> {
    let mut nodes = Vec::with_capacity(instance.len());

    for (position, (key, value)) in instance.iter().enumerate() {
        if let Some(field) = message.field(key) {
            let mut node = MergedNode::from_field(field, value.clone());
            node.id = position;
            nodes.push(node);
            continue;
        }

        let Some(sub) = message.message(key) else {
            trace!(path, key = %key, "dropping key with no schema match");
            continue;
        };

        let sub_path = child_path(path, key);
        let mut node = MergedNode::from_message(sub);
        node.id = position;
        match value {
            Value::Null => continue,
            Value::Array(items) => {
                node.arrays = resolve_array(sub, items, &sub_path)?;
            }
            // A single instance surfaces as inline fields, not an array of one.
            Value::Object(object) => {
                node.fields = resolve_instance(sub, object, &sub_path)?;
            }
            other => {
                return Err(ConvertError::format(
                    sub_path,
                    format!("expected an object or array, found {}", type_name(other)),
                ));
            }
        }
        nodes.push(node);
    }

    Ok(reindex(nodes))
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
