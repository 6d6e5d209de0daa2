use std::path::{Path, PathBuf};

use anyhow::Result;
use fs_err as fs;
use serde_json::{Map, Value};

pub const MANIFEST_NAME: &str = "package.json";

/// Typed failures for manifest reads; callers downcast these to produce
/// user-facing guidance instead of a bare stack of IO errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("{path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} must contain a single JSON object")]
    NotAnObject { path: PathBuf },
}

/// In-memory view of `package.json`. Keys keep their on-disk order
/// (`serde_json` with `preserve_order`), so unrelated entries round-trip
/// verbatim across an edit.
#[derive(Debug)]
pub struct Manifest {
    entries: Map<String, Value>,
}

impl Manifest {
    /// Read the manifest under `root`, or synthesize a minimal one when the
    /// file is absent. The boolean reports whether a manifest was synthesized.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or does not parse as a
    /// JSON object.
    pub fn load(root: &Path) -> Result<(Self, bool)> {
        let path = root.join(MANIFEST_NAME);
        if !path.exists() {
            return Ok((Self::synthesize(root), true));
        }
        let contents = fs::read_to_string(&path)?;
        let manifest = Self::parse(&contents, &path)?;
        Ok((manifest, false))
    }

    fn parse(contents: &str, path: &Path) -> Result<Self> {
        let value: Value =
            serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }

    fn synthesize(root: &Path) -> Self {
        let mut entries = Map::new();
        entries.insert(
            "name".to_string(),
            Value::String(sanitize_package_candidate(root)),
        );
        entries.insert("version".to_string(), Value::String("1.0.0".to_string()));
        Self { entries }
    }

    /// Write the manifest back under `root`, pretty-printed with a trailing
    /// newline.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the file write fails.
    pub fn save(&self, root: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(&self.entries)?;
        text.push('\n');
        fs::write(root.join(MANIFEST_NAME), text)?;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.entries.get("name").and_then(Value::as_str)
    }

    pub fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.entries.get(key).and_then(Value::as_object)
    }

    /// Borrow the object stored under `key`, resetting any non-object value
    /// first. The boolean reports whether a reset happened.
    pub fn section_mut(&mut self, key: &str) -> (&mut Map<String, Value>, bool) {
        let reset = !matches!(self.entries.get(key), Some(Value::Object(_)));
        if reset {
            self.entries
                .insert(key.to_string(), Value::Object(Map::new()));
        }
        let map = self
            .entries
            .get_mut(key)
            .and_then(Value::as_object_mut)
            .expect("object section");
        (map, reset)
    }
}

pub fn sanitize_package_candidate(root: &Path) -> String {
    let raw = root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("package");
    sanitize_package_name(raw)
}

fn sanitize_package_name(raw: &str) -> String {
    let mut result = String::new();
    let mut last_was_sep = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if matches!(ch, '-' | '_' | ' ' | '.') {
            if !last_was_sep {
                result.push('-');
                last_was_sep = true;
            }
        } else {
            last_was_sep = false;
        }
    }
    while result.starts_with('-') {
        result.remove(0);
    }
    while result.ends_with('-') {
        result.pop();
    }
    if result.is_empty() {
        return "package".to_string();
    }
    result
}
