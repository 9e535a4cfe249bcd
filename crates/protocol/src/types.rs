use serde::{Deserialize, Serialize};

/// A file picked by the user for upload.
///
/// `name` is the key used by the manifest, the progress store and the
/// server's progress messages, so it must be unique within one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_file_json_shape() {
        let file = SelectedFile::new("x.txt", 2048);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json, serde_json::json!({"name": "x.txt", "size": 2048}));
    }
}
