//! Rule store backed by a flat text file.
//!
//! The file lives at `<config-root>/configsetting/convertconfig.txt`. It is read
//! once when the store opens; appends go to the end of the file and publish a
//! new in-memory snapshot. A fold holds the `Arc` it started with, so appends
//! made while it runs are not visible to it.

use super::{parse_rules, RuleSet};
use crate::error::ConvertError;
use parking_lot::{Mutex, RwLock};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const RULES_DIR: &str = "configsetting";
pub const RULES_FILE: &str = "convertconfig.txt";

/// Path to the rule file under a config root.
pub fn rules_path(config_root: &Path) -> PathBuf {
    config_root.join(RULES_DIR).join(RULES_FILE)
}

pub struct RuleStore {
    path: PathBuf,
    current: RwLock<Arc<RuleSet>>,
    append_lock: Mutex<()>,
}

impl RuleStore {
    /// Open the store at `path`. A missing file is an empty rule set.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConvertError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConvertError::InvalidArgument(
                "rule file path is empty".to_string(),
            ));
        }
        let set = read_rule_set(&path)?;
        debug!(
            path = %path.display(),
            skip_properties = set.skip_properties.len(),
            rules = set.rules.len(),
            "loaded conversion rules"
        );
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(set)),
            append_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current rule set.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.current.read().clone()
    }

    /// Re-read the file and publish it as the current rule set.
    pub fn reload(&self) -> Result<Arc<RuleSet>, ConvertError> {
        let _guard = self.append_lock.lock();
        let set = Arc::new(read_rule_set(&self.path)?);
        *self.current.write() = Arc::clone(&set);
        Ok(set)
    }

    /// Append comma-separated skip properties.
    ///
    /// Names are trimmed and lower-cased; names already in the set are not
    /// written again. Existing lines are never rewritten.
    pub fn append_skip_properties(&self, csv: &str) -> Result<bool, ConvertError> {
        let requested: Vec<String> = csv
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if requested.is_empty() {
            return Err(ConvertError::InvalidArgument(
                "no skip properties given".to_string(),
            ));
        }
        // Each name is stored as one line of the rule file.
        let line_break = |c: char| c == '\n' || c == '\r';
        if let Some(name) = requested.iter().find(|name| name.contains(line_break)) {
            return Err(ConvertError::InvalidArgument(format!(
                "skip property {:?} contains a line break",
                name
            )));
        }

        let _guard = self.append_lock.lock();
        let current = self.snapshot();
        let mut next = (*current).clone();
        let fresh: Vec<String> = requested
            .into_iter()
            .filter(|name| next.skip_properties.insert(name.clone()))
            .collect();
        if fresh.is_empty() {
            debug!(path = %self.path.display(), "skip properties already present");
            return Ok(true);
        }

        append_lines(&self.path, &fresh)?;
        *self.current.write() = Arc::new(next);
        info!(path = %self.path.display(), added = ?fresh, "appended skip properties");
        Ok(true)
    }
}

fn read_rule_set(path: &Path) -> Result<RuleSet, ConvertError> {
    if !path.exists() || !path.is_file() {
        return Ok(RuleSet::default());
    }
    let contents = fs::read_to_string(path)?;
    Ok(parse_rules(&contents)?)
}

fn append_lines(path: &Path, lines: &[String]) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let needs_newline = match fs::read(path) {
        Ok(bytes) => bytes.last().is_some_and(|b| *b != b'\n'),
        Err(_) => false,
    };
    let mut f = fs::OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        writeln!(f)?;
    }
    for line in lines {
        writeln!(f, "{}", line)?;
    }
    f.flush()?;
    Ok(())
}
