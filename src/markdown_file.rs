use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub struct File {
    pub path: PathBuf,
    pub content: String,
}

impl File {
    pub fn at_path(path: PathBuf) -> Result<Self> {
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Self { path, content }),
            Err(source) => Err(Error::Read { path, source }),
        }
    }

    /// Replaces the file's content by writing a uniquely named sibling temp
    /// file and renaming it over the original.
    pub fn atomic_overwrite(&self, content: &str) -> Result<()> {
        let write_err = |source| Error::Write {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_err)?;
        }
        tmp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| write_err(e.error))
    }

    /// Writes `content` only if it differs from what was read. Returns whether
    /// the file was written.
    pub fn overwrite_if_changed(&self, content: &str) -> Result<bool> {
        if self.content == content {
            return Ok(false);
        }
        self.atomic_overwrite(content)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "old").unwrap();

        let file = File::at_path(path.clone()).unwrap();
        assert_eq!("old", file.content);
        file.atomic_overwrite("new").unwrap();

        assert_eq!("new", fs::read_to_string(&path).unwrap());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(1, leftovers.len());
    }

    #[test]
    fn overwrite_keeps_similarly_named_neighbours() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        let neighbour = dir.path().join("note.tmp.md");
        fs::write(&path, "old").unwrap();
        fs::write(&neighbour, "my other notes").unwrap();

        File::at_path(path.clone())
            .unwrap()
            .atomic_overwrite("new")
            .unwrap();

        assert_eq!("new", fs::read_to_string(&path).unwrap());
        assert_eq!("my other notes", fs::read_to_string(&neighbour).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        File::at_path(path.clone())
            .unwrap()
            .atomic_overwrite("new")
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(0o644, mode & 0o777);
    }

    #[test]
    fn overwrite_into_missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = File {
            path: dir.path().join("gone/note.md"),
            content: String::new(),
        };
        assert!(matches!(file.atomic_overwrite("new"), Err(Error::Write { .. })));
    }

    #[test]
    fn skips_unchanged_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "same").unwrap();

        let file = File::at_path(path).unwrap();
        assert!(!file.overwrite_if_changed("same").unwrap());
        assert!(file.overwrite_if_changed("different").unwrap());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = File::at_path(dir.path().join("nope.md")).err().unwrap();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.md");
        fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();
        assert!(matches!(File::at_path(path), Err(Error::Read { .. })));
    }
}
