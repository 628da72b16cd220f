use std::path::{Path, PathBuf};

use console::style;
use log::{debug, error};
use rayon::prelude::*;

use crate::{diff::diff, error::Error, markdown_file::File, math_blocks::fix_math_blocks};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Overwrite files that need fixing.
    Write,
    /// Report what would change without touching the files.
    Check,
}

#[derive(Debug)]
pub enum Outcome {
    Unchanged,
    Fixed,
    NeedsFix { diff: String },
    Failed(Error),
}

impl Outcome {
    pub fn is_success(&self, mode: Mode) -> bool {
        match self {
            Outcome::Unchanged | Outcome::Fixed => true,
            Outcome::NeedsFix { .. } => mode == Mode::Write,
            Outcome::Failed(_) => false,
        }
    }

    /// The report line for stdout. Failures have none, they are logged.
    pub fn summary(&self, path: &Path) -> Option<String> {
        match self {
            Outcome::Unchanged => Some(
                style(format!("  {} (no changes needed)", path.display()))
                    .dim()
                    .to_string(),
            ),
            Outcome::Fixed => Some(format!("{} {}", style("✓").green(), path.display())),
            Outcome::NeedsFix { diff } => Some(format!(
                "{} {}\n{diff}",
                style("~").yellow(),
                path.display()
            )),
            Outcome::Failed(_) => None,
        }
    }

    pub fn report(&self, path: &Path) {
        match self.summary(path) {
            Some(line) => println!("{line}"),
            None => {
                if let Outcome::Failed(e) = self {
                    error!("{e}");
                }
            }
        }
    }
}

fn fix_file(path: PathBuf, mode: Mode) -> Outcome {
    let file = match File::at_path(path) {
        Ok(file) => file,
        Err(e) => return Outcome::Failed(e),
    };
    let fixed = fix_math_blocks(&file.content);
    if fixed == file.content {
        return Outcome::Unchanged;
    }
    match mode {
        Mode::Check => Outcome::NeedsFix {
            diff: diff(&file.content, &fixed),
        },
        Mode::Write => match file.atomic_overwrite(&fixed) {
            Ok(()) => Outcome::Fixed,
            Err(e) => Outcome::Failed(e),
        },
    }
}

/// Fixes every file, in parallel. One file failing does not stop the others;
/// results come back in the same order as `files`.
#[must_use]
pub fn fix_files(files: Vec<PathBuf>, mode: Mode) -> Vec<(PathBuf, Outcome)> {
    files
        .into_par_iter()
        .map(|path| {
            debug!("fixing math blocks in {}", path.display());
            let outcome = fix_file(path.clone(), mode);
            (path, outcome)
        })
        .collect()
}
