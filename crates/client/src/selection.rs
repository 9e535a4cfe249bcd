//! Turning filesystem paths into a file selection.
//!
//! Plain files are picked under their file name. Directories are walked
//! recursively and their files named by the `/`-separated path relative
//! to the directory's parent, so `photos/2024/a.jpg` stays distinct from
//! `a.jpg`.

use std::path::Path;

use crate::error::SessionError;
use crate::types::PickedFile;

/// Builds a selection from `paths`, in the order given.
///
/// Directory entries are visited in name order.
pub fn pick_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PickedFile>, SessionError> {
    let mut picked = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;

        if metadata.is_dir() {
            let root = path.parent().unwrap_or(path);
            walk_dir(root, path, &mut picked)?;
        } else {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("{}: not a file name", path.display()),
                    )
                })?;
            picked.push(PickedFile::new(name, metadata.len(), path));
        }
    }

    Ok(picked)
}

fn walk_dir(root: &Path, current: &Path, picked: &mut Vec<PickedFile>) -> Result<(), SessionError> {
    let mut entries = std::fs::read_dir(current)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk_dir(root, &path, picked)?;
        } else if metadata.is_file() {
            let rel_path = path.strip_prefix(root).map_err(std::io::Error::other)?;

            // Normalize to forward slashes.
            let name = rel_path.to_string_lossy().replace('\\', "/");
            picked.push(PickedFile::new(name, metadata.len(), path.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn picks_plain_files_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), b"BB").unwrap();
        fs::write(dir.path().join("a.bin"), vec![0u8; 2048]).unwrap();

        let picked = pick_paths(&[dir.path().join("b.txt"), dir.path().join("a.bin")]).unwrap();
        let names: Vec<(&str, u64)> = picked.iter().map(|p| (p.name(), p.size())).collect();
        assert_eq!(names, vec![("b.txt", 2), ("a.bin", 2048)]);
    }

    #[test]
    fn walks_directories_with_relative_names() {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir_all(photos.join("2024")).unwrap();
        fs::write(photos.join("cover.png"), b"PNG").unwrap();
        fs::write(photos.join("2024").join("a.jpg"), b"JPEG!").unwrap();

        let picked = pick_paths(&[&photos]).unwrap();
        let names: Vec<&str> = picked.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["photos/2024/a.jpg", "photos/cover.png"]);
        assert_eq!(picked[0].size(), 5);
        assert_eq!(picked[0].path, photos.join("2024").join("a.jpg"));
    }

    #[test]
    fn empty_selection() {
        let picked = pick_paths::<&Path>(&[]).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn missing_path_fails() {
        let result = pick_paths(&["/nonexistent/path/that/does/not/exist"]);
        assert!(matches!(result, Err(SessionError::Io(_))));
    }
}
