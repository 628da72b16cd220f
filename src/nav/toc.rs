use std::path::Path;

use lazy_static::lazy_static;
use log::{info, warn};
use regex::{NoExpand, Regex};

use super::{rewrite_index_pages, Site, INDEX_FILE};
use crate::{error::Result, util::markdown_files_under};

pub const TOC_MARKER: &str = r#"!!! abstract "Table of Contents""#;

lazy_static! {
    static ref TOC_SECTION: Regex =
        Regex::new(&format!("(?s){}.*", regex::escape(TOC_MARKER))).unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub link: String,
}

impl TocEntry {
    fn render(&self) -> String {
        format!("    - [{}]({})", self.title, self.link)
    }
}

/// Every page of a category except index pages, ordered by file name.
pub fn entries(category_dir: &Path) -> Result<Vec<TocEntry>> {
    let mut pages: Vec<_> = markdown_files_under(category_dir)?
        .into_iter()
        .filter(|path| path.file_name().map_or(true, |name| name != INDEX_FILE))
        .filter_map(|path| {
            let rel = path.strip_prefix(category_dir).ok()?;
            let name = path.file_name()?.to_string_lossy().into_owned();
            let entry = TocEntry {
                title: path.file_stem()?.to_string_lossy().into_owned(),
                link: rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
            };
            Some((name, entry))
        })
        .collect();
    pages.sort_by(|(a_name, a), (b_name, b)| a_name.cmp(b_name).then_with(|| a.link.cmp(&b.link)));
    Ok(pages.into_iter().map(|(_, entry)| entry).collect())
}

/// Replaces everything from the table of contents marker to the end of the
/// page with a fresh list of links. The flag is true when the marker was
/// missing and had to be appended.
pub fn rewrite(text: &str, entries: &[TocEntry]) -> (String, bool) {
    let appended = !TOC_SECTION.is_match(text);
    let text = if appended {
        format!("{}\n\n{TOC_MARKER}\n", text.trim_end())
    } else {
        text.to_string()
    };

    let mut section = vec![TOC_MARKER.to_string()];
    section.extend(entries.iter().map(TocEntry::render));
    let section = section.join("\n");

    let new = TOC_SECTION.replace(&text, NoExpand(&section)).into_owned();
    (new, appended)
}

/// Regenerates the table of contents of every category index page.
pub fn generate_links(site: &Site) -> Result<usize> {
    info!("generating tables of contents under {}", site.docs_dir.display());
    rewrite_index_pages(site, |dir, text| {
        let (new, appended) = rewrite(text, &entries(dir)?);
        if appended {
            warn!("no table of contents in {}, appending one", dir.join(INDEX_FILE).display());
        }
        Ok(new)
    })
}
