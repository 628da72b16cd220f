use lazy_static::lazy_static;
use log::info;
use regex::{NoExpand, Regex};

use super::{rewrite_index_pages, Site};
use crate::error::Result;

lazy_static! {
    static ref FRONT_MATTER: Regex = Regex::new(r"(?s)\A---\r?\n.*?\r?\n---").unwrap();
}

/// Replaces a leading `---` block with `front_matter`, or prepends it when
/// the page has none. The inserted block uses the page's line endings.
pub fn normalize(text: &str, front_matter: &str) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let front_matter = front_matter.replace("\r\n", "\n").replace('\n', newline);
    if FRONT_MATTER.is_match(text) {
        FRONT_MATTER
            .replace(text, NoExpand(&front_matter))
            .into_owned()
    } else {
        format!("{front_matter}{newline}{text}")
    }
}

/// Gives every category index page the site's fixed front matter.
pub fn format_index_pages(site: &Site) -> Result<usize> {
    info!("normalizing front matter under {}", site.docs_dir.display());
    rewrite_index_pages(site, |_, text| Ok(normalize(text, &site.front_matter)))
}
