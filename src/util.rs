use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

const MARKDOWN_EXTENSION: &str = "md";

pub fn is_visible(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |s| !s.starts_with('.'))
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
}

/// Every markdown file below `dir`, skipping hidden files and directories.
pub fn markdown_files_under(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || is_visible(e))
    {
        let entry = entry.map_err(|source| Error::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Resolves the command line paths into a sorted, deduplicated list of
/// markdown files. Directories are searched recursively; files with another
/// extension are ignored.
pub fn collect_markdown_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for path in paths {
        if path.is_file() {
            if is_markdown(path) {
                files.insert(path.clone());
            }
        } else if path.is_dir() {
            files.extend(markdown_files_under(path)?);
        }
    }
    Ok(files.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use pretty_assertions::assert_eq;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn walks_directories_for_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let b = touch(root, "b.md");
        let a = touch(root, "sub/a.md");
        touch(root, "sub/image.png");
        touch(root, ".git/HEAD.md");
        touch(root, "sub/.hidden.md");

        let mut found = markdown_files_under(root).unwrap();
        found.sort();
        assert_eq!(vec![b, a], found);
    }

    #[test]
    fn collects_sorted_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let z = touch(root, "z.md");
        let a = touch(root, "docs/a.md");
        let txt = touch(root, "notes.txt");

        let found =
            collect_markdown_files(&[z.clone(), root.join("docs"), a.clone(), txt, root.join("docs")])
                .unwrap();
        assert_eq!(vec![a, z], found);
    }

    #[test]
    fn explicit_hidden_directory_is_walked() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".drafts");
        let post = touch(&hidden, "post.md");

        assert_eq!(vec![post], collect_markdown_files(&[hidden]).unwrap());
    }

    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let found = collect_markdown_files(&[dir.path().join("missing")]).unwrap();
        assert!(found.is_empty());
    }
}
