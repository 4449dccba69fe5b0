//! MergedNode: a schema field's metadata combined with its resolved value.

use crate::schema::{Field, Message};
use crate::value::{render_scalar_array, Value};
use serde::{Deserialize, Serialize};

/// Data type recorded on nodes built from sub-messages.
pub const MESSAGE_DATA_TYPE: &str = "message";

/// One node of the merged output tree.
///
/// `fields` holds singular children; `arrays[i]` holds the field list of the
/// i-th instance of a repeated message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedNode {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub min: Value,
    #[serde(default)]
    pub max: Value,
    #[serde(default)]
    pub default_value: Value,
    #[serde(default)]
    pub data_type: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub fields: Vec<MergedNode>,
    #[serde(default)]
    pub arrays: Vec<Vec<MergedNode>>,
}

fn default_visible() -> bool {
    true
}

impl MergedNode {
    /// Copy every attribute of `field` and attach `value`.
    ///
    /// Array values are stored as their bracketed text form (`"[1,2,3]"`).
    pub fn from_field(field: &Field, value: Value) -> Self {
        let value = match value {
            Value::Array(items) => Value::String(render_scalar_array(&items)),
            other => other,
        };
        Self {
            id: 0,
            name: field.name.clone(),
            value,
            min: field.min.clone(),
            max: field.max.clone(),
            default_value: field.default_value.clone(),
            data_type: field.data_type.clone(),
            is_visible: true,
            fields: Vec::new(),
            arrays: Vec::new(),
        }
    }

    /// Empty container node for a sub-message.
    pub fn from_message(message: &Message) -> Self {
        Self {
            id: 0,
            name: message.name.clone(),
            value: Value::Null,
            min: Value::Null,
            max: Value::Null,
            default_value: Value::Null,
            data_type: MESSAGE_DATA_TYPE.to_string(),
            is_visible: true,
            fields: Vec::new(),
            arrays: Vec::new(),
        }
    }

    pub fn is_message(&self) -> bool {
        self.data_type == MESSAGE_DATA_TYPE
    }

    /// True when this node or any descendant satisfies `pred`.
    pub fn any(&self, pred: &dyn Fn(&MergedNode) -> bool) -> bool {
        pred(self)
            || self.fields.iter().any(|n| n.any(pred))
            || self.arrays.iter().flatten().any(|n| n.any(pred))
    }

    /// Hide this subtree when `hidden(name)` holds, otherwise recurse.
    pub fn hide_matching(&mut self, hidden: &dyn Fn(&str) -> bool) {
        if hidden(&self.name) {
            self.set_visible(false);
            return;
        }
        for node in self.fields.iter_mut() {
            node.hide_matching(hidden);
        }
        for node in self.arrays.iter_mut().flatten() {
            node.hide_matching(hidden);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
        for node in self.fields.iter_mut() {
            node.set_visible(visible);
        }
        for node in self.arrays.iter_mut().flatten() {
            node.set_visible(visible);
        }
    }
}

/// Rewrite ids to 0..N-1 in list order.
pub fn reindex(mut nodes: Vec<MergedNode>) -> Vec<MergedNode> {
    for (id, node) in nodes.iter_mut().enumerate() {
        node.id = id;
    }
    nodes
}

/// Search a node list (and every nested level) for a predicate.
pub fn any_node(nodes: &[MergedNode], pred: &dyn Fn(&MergedNode) -> bool) -> bool {
    nodes.iter().any(|n| n.any(pred))
}
