//! The `filesize` manifest: declared name → size for every selected file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SelectedFile;

/// Declared sizes of the files in one submission.
///
/// Serializes as a flat JSON object, e.g. `{"a.txt":10,"b.bin":20}`.
/// Built once per submission and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileManifest {
    sizes: BTreeMap<String, u64>,
}

impl FileManifest {
    /// Builds the manifest from the selection, in selection order.
    ///
    /// Sizes are taken verbatim from each [`SelectedFile`]. When two files
    /// share a name the later one wins.
    pub fn build<'a>(files: impl IntoIterator<Item = &'a SelectedFile>) -> Self {
        let mut sizes = BTreeMap::new();
        for file in files {
            sizes.insert(file.name.clone(), file.size);
        }
        Self { sizes }
    }

    /// Returns the declared size for `name`.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.sizes.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Serializes the manifest to the string posted in the `filesize` field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a manifest as posted by a client.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builds the serialized manifest for `files` in one step.
pub fn build_manifest(files: &[SelectedFile]) -> Result<String, serde_json::Error> {
    FileManifest::build(files).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_back_to_sizes() {
        let files = vec![SelectedFile::new("a", 10), SelectedFile::new("b", 20)];
        let json = build_manifest(&files).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::json!({"a": 10, "b": 20}));
    }

    #[test]
    fn manifest_duplicate_name_keeps_later_size() {
        let files = vec![
            SelectedFile::new("a", 10),
            SelectedFile::new("b", 20),
            SelectedFile::new("a", 30),
        ];
        let manifest = FileManifest::build(&files);
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("a"), Some(30));
        assert_eq!(manifest.get("b"), Some(20));
    }

    #[test]
    fn manifest_single_file_exact_string() {
        let files = vec![SelectedFile::new("x.txt", 2048)];
        assert_eq!(build_manifest(&files).unwrap(), r#"{"x.txt":2048}"#);
    }

    #[test]
    fn manifest_empty_selection() {
        let manifest = FileManifest::build(&[]);
        assert!(manifest.is_empty());
        assert_eq!(manifest.to_json().unwrap(), "{}");
    }

    #[test]
    fn manifest_from_json() {
        let manifest = FileManifest::from_json(r#"{"photo.jpg": 123456}"#).unwrap();
        assert_eq!(manifest.get("photo.jpg"), Some(123456));
        assert!(manifest.get("missing").is_none());
    }

    #[test]
    fn manifest_rejects_negative_sizes() {
        assert!(FileManifest::from_json(r#"{"a": -1}"#).is_err());
    }
}
