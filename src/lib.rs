//! fwconf: schema-aware firmware configuration reconciliation.
//!
//! Merges TOML/JSON device configuration with a protobuf-style schema into an
//! annotated node tree for editing, renders default-value JSON from a base
//! configuration, and folds edited JSON back into TOML under a small rule
//! language (`convertconfig.txt`).

pub mod cli;
pub mod config;
pub mod error;
pub mod fold;
pub mod logging;
pub mod merge;
pub mod render;
pub mod rules;
pub mod schema;
pub mod service;
pub mod value;
