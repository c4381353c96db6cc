//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::Path;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_dir_all_if_exists() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file.o"), b"obj").unwrap();

        assert!(remove_dir_all_if_exists(&dir).unwrap());
        assert!(!dir.exists());
        assert!(!remove_dir_all_if_exists(&dir).unwrap());
    }

    #[test]
    fn test_ensure_dir_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("build/Debug/build-linux-cc");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_dir(&dir).unwrap();
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("build");
        fs::write(&file, b"not a dir").unwrap();

        assert!(ensure_dir(&file.join("Debug")).is_err());
    }
}
