//! Schema Tree: the in-memory model of a protobuf message definition.
//!
//! The proto-definition loader lives outside this crate; its output arrives as a
//! descriptor document (JSON or TOML) that deserializes straight into
//! [`Message`] and [`Field`].

use crate::error::{ConvertError, SchemaError};
use crate::value::{names_match, DataFormat, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One leaf schema element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub id: i64,
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
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            value: Value::Null,
            min: Value::Null,
            max: Value::Null,
            default_value: Value::Null,
            data_type: data_type.into(),
        }
    }

    pub fn with_bounds(mut self, min: Value, max: Value) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_default(mut self, default_value: Value) -> Self {
        self.default_value = default_value;
        self
    }
}

/// A nested protobuf message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_repeated: bool,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            is_repeated: false,
            fields: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn repeated(mut self) -> Self {
        self.is_repeated = true;
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// No fields and no sub-messages: nothing to merge against.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.messages.is_empty()
    }

    /// Case-insensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| names_match(&f.name, name))
    }

    /// Case-insensitive sub-message lookup.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| names_match(&m.name, name))
    }

    /// Names must be non-empty and unique within each message, recursively.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        let names = self
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(self.messages.iter().map(|m| m.name.as_str()));
        for name in names {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyName(self.name.clone()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(SchemaError::DuplicateName {
                    message: self.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        for message in &self.messages {
            message.validate()?;
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConvertError> {
        let message: Message = serde_json::from_str(text)?;
        message.validate()?;
        Ok(message)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConvertError> {
        let message: Message = toml::from_str(text)?;
        message.validate()?;
        Ok(message)
    }

    /// Load a descriptor document, picking the format from the extension.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        if path.as_os_str().is_empty() {
            return Err(ConvertError::InvalidArgument(
                "schema path is empty".to_string(),
            ));
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConvertError::read_file(path, e))?;
        match DataFormat::from_path(path)? {
            DataFormat::Json => Self::from_json_str(&text),
            DataFormat::Toml => Self::from_toml_str(&text),
        }
    }
}
