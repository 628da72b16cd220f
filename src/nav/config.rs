use std::{collections::BTreeSet, fs};

use console::style;
use log::{info, warn};
use serde_yaml::Value;

use super::Site;
use crate::error::{Error, Result};

const BLOG_PLUGIN: &str = "blogging";

/// The `dirs` of the first `blogging` entry in the `plugins` list, if any.
pub fn blog_dirs(config: &Value) -> Option<Vec<String>> {
    config
        .get("plugins")?
        .as_sequence()?
        .iter()
        .find_map(|plugin| plugin.get(BLOG_PLUGIN))
        .map(|blogging| {
            blogging
                .get("dirs")
                .and_then(Value::as_sequence)
                .map(|dirs| {
                    dirs.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
}

#[derive(Debug, PartialEq, Eq)]
pub struct DirCheck {
    pub configured: BTreeSet<String>,
    pub on_disk: BTreeSet<String>,
}

impl DirCheck {
    pub fn is_consistent(&self) -> bool {
        self.configured == self.on_disk
    }

    /// Configured but not present under the docs directory.
    pub fn missing_on_disk(&self) -> Vec<&str> {
        self.configured
            .difference(&self.on_disk)
            .map(String::as_str)
            .collect()
    }

    /// Present under the docs directory but not configured.
    pub fn missing_in_config(&self) -> Vec<&str> {
        self.on_disk
            .difference(&self.configured)
            .map(String::as_str)
            .collect()
    }

    pub fn report(&self) {
        if self.is_consistent() {
            println!("{}", style("blogging dirs match the docs directory").green().bold());
            return;
        }
        eprintln!("{}", style("blogging dirs do not match the docs directory").red().bold());
        eprintln!("  configured: {:?}", self.configured);
        eprintln!("  on disk:    {:?}", self.on_disk);
        for name in self.missing_on_disk() {
            eprintln!("  {} {name}", style("no such directory:").red());
        }
        for name in self.missing_in_config() {
            eprintln!("  {} {name}", style("not configured:").red());
        }
    }
}

pub fn load(site: &Site) -> Result<Value> {
    let text = fs::read_to_string(&site.config_file).map_err(|source| Error::Read {
        path: site.config_file.clone(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
        path: site.config_file.clone(),
        source,
    })
}

/// Compares the configured blog directories with the categories on disk.
/// `None` when the configuration has no blogging plugin.
pub fn check_blog_dirs(site: &Site) -> Result<Option<DirCheck>> {
    info!("checking {}", site.config_file.display());
    let Some(configured) = blog_dirs(&load(site)?) else {
        warn!(
            "no `{BLOG_PLUGIN}` plugin in {}",
            site.config_file.display()
        );
        return Ok(None);
    };
    Ok(Some(DirCheck {
        configured: configured.into_iter().collect(),
        on_disk: site.category_names()?.into_iter().collect(),
    }))
}
