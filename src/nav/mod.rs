//! Navigation upkeep for the category index pages of an MkDocs blog.

pub mod config;
pub mod front_matter;
pub mod toc;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use log::error;
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    markdown_file::File,
};

pub const DEFAULT_EXCLUDE: [&str; 3] = ["assets", "css", "js"];

pub const DEFAULT_FRONT_MATTER: &str = "---
icon: material/dots-grid
comments: false
nostatistics: true
---";

pub const INDEX_FILE: &str = "index.md";

/// Where the documentation lives and which directories count as categories.
#[derive(Clone, Debug)]
pub struct Site {
    pub docs_dir: PathBuf,
    pub config_file: PathBuf,
    pub exclude: BTreeSet<String>,
    pub front_matter: String,
}

impl Site {
    /// The usual MkDocs layout: `<root>/docs` and `<root>/mkdocs.yml`.
    pub fn at_root(root: &Path) -> Self {
        Self {
            docs_dir: root.join("docs"),
            config_file: root.join("mkdocs.yml"),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            front_matter: DEFAULT_FRONT_MATTER.to_string(),
        }
    }

    /// Direct subdirectories of the docs directory, minus the excluded ones,
    /// sorted by name.
    pub fn categories(&self) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in WalkDir::new(&self.docs_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| Error::Walk {
                path: self.docs_dir.clone(),
                source,
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let excluded = entry
                .file_name()
                .to_str()
                .map_or(false, |name| self.exclude.contains(name));
            if !excluded {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }

    pub fn category_names(&self) -> Result<Vec<String>> {
        Ok(self
            .categories()?
            .iter()
            .filter_map(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }
}

/// Runs `rewrite` over every category's index page and writes back the pages
/// that changed. Returns the number of pages that could not be processed.
pub(crate) fn rewrite_index_pages<F>(site: &Site, mut rewrite: F) -> Result<usize>
where
    F: FnMut(&Path, &str) -> Result<String>,
{
    let mut failures = 0;
    for dir in site.categories()? {
        let index = dir.join(INDEX_FILE);
        let outcome = if index.is_file() {
            File::at_path(index).and_then(|file| {
                let new = rewrite(&dir, &file.content)?;
                file.overwrite_if_changed(&new)
            })
        } else {
            Err(Error::MissingIndex(dir))
        };
        if let Err(e) = outcome {
            error!("{e}");
            failures += 1;
        }
    }
    Ok(failures)
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use pretty_assertions::assert_eq;

    use test_site::site_with;

    #[test]
    fn lists_categories_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let site = site_with(
            dir.path(),
            &[
                ("rust/index.md", ""),
                ("assets/logo.md", ""),
                ("js/extra.md", ""),
                ("algorithms/index.md", ""),
                ("index.md", ""),
            ],
        );

        assert_eq!(vec!["algorithms", "rust"], site.category_names().unwrap());
    }

    #[test]
    fn categories_are_direct_children_only() {
        let dir = tempfile::tempdir().unwrap();
        let site = site_with(
            dir.path(),
            &[("rust/lang/deep.md", ""), ("rust/index.md", ""), ("top.md", "")],
        );

        assert_eq!(vec![dir.path().join("docs/rust")], site.categories().unwrap());
    }

    #[test]
    fn missing_docs_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::at_root(dir.path());
        assert!(matches!(site.categories(), Err(Error::Walk { .. })));
    }

    #[test]
    fn missing_index_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let site = site_with(
            dir.path(),
            &[("rust/index.md", "a"), ("empty/post.md", "b")],
        );

        let failures = rewrite_index_pages(&site, |_, text| Ok(format!("{text}!"))).unwrap();

        assert_eq!(1, failures);
        assert_eq!(
            "a!",
            fs::read_to_string(dir.path().join("docs/rust/index.md")).unwrap()
        );
    }
}
