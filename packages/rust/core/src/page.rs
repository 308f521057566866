//! Page entity and page set.
//!
//! A [`Page`] is one in-memory record per source file: derived identity
//! (heading, normalized output file name, space) plus the orchestration of
//! the normalizer pipeline over the page's content. Pages are created once
//! per run and never mutated concurrently; the parsed tree is consumed by
//! [`Page::text_to_convert`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kuchiki::NodeRef;

use spacedown_html::normalize::{self, NormalizedContent};
use spacedown_html::{dom, table};
use spacedown_shared::{Result, SpacedownError};

use crate::links;

/// File name of the root (table-of-contents) page of a space.
pub const INDEX_FILE_NAME: &str = "index.html";

/// One source page of the export.
pub struct Page {
    /// Absolute source path (the page's identity).
    pub path: PathBuf,
    /// Original file name, e.g. `Coding_Standards.html`.
    pub file_name: String,
    /// Original file name without the `.html` extension.
    pub file_base_name: String,
    /// Human-readable heading, extracted from the document title.
    pub heading: String,
    /// Normalized output file name, e.g. `Coding_Standards.md`.
    pub file_name_new: String,
    /// Space (parent directory) name.
    pub space: String,
    /// Relative link template used when a link crosses spaces.
    pub space_path: String,
    document: NodeRef,
}

impl Page {
    /// Load and parse a source page.
    pub fn load(path: &Path) -> Result<Self> {
        let markup =
            std::fs::read_to_string(path).map_err(|e| SpacedownError::io(path, e))?;
        Self::from_markup(path, &markup)
    }

    /// Build a page from markup already in memory.
    pub fn from_markup(path: &Path, markup: &str) -> Result<Self> {
        let file_name = base_name(path)
            .ok_or_else(|| {
                SpacedownError::parse(format!("source path has no file name: {}", path.display()))
            })?
            .to_string();
        let file_base_name = file_name
            .strip_suffix(".html")
            .unwrap_or(&file_name)
            .to_string();
        let space = path
            .parent()
            .and_then(base_name)
            .unwrap_or_default()
            .to_string();

        let document = dom::parse_document(markup);
        let heading = extract_heading(&document, &file_name);
        let file_name_new = if file_name == INDEX_FILE_NAME {
            "index.md".to_string()
        } else {
            format!("{}.md", normalize_file_name(&heading))
        };
        let space_path = format!("../{space}/{file_name_new}");

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            file_base_name,
            heading,
            file_name_new,
            space,
            space_path,
            document,
        })
    }

    /// Whether this is a space's root (table-of-contents) page.
    pub fn is_index(&self) -> bool {
        self.file_name == INDEX_FILE_NAME
    }

    /// The parsed document tree (used by the navigation resolver).
    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// Run the normalizer pipeline over this page's content region.
    ///
    /// The pass order is fixed; later passes assume earlier ones ran (panels
    /// become marked blockquotes before the class stripping would erase the
    /// marker-bearing wrapper, image-bearing spans unwrap before the generic
    /// span-to-text pass would swallow the images).
    pub fn text_to_convert(&self, pages: &PageSet) -> NormalizedContent {
        let region = normalize::select_region(&self.document, &self.file_name);

        normalize::fix_headline(&region);
        normalize::fix_icons(&region);
        normalize::fix_empty_links(&region);
        let note_fixed = normalize::fix_note_panels(&region);
        let warning_fixed = normalize::fix_warning_panels(&region);
        let info_fixed = normalize::fix_info_panels(&region);
        normalize::strip_link_attributes(&region);
        normalize::fix_empty_headings(&region);
        normalize::fix_preformatted_text(&region);
        let table_fixed = table::reconstruct_tables(&region);
        normalize::fix_image_within_span(&region);
        normalize::strip_image_attributes(&region);
        normalize::replace_elements_with_text(&region);
        normalize::fix_arbitrary_classes(&region);
        normalize::fix_attachment_wrapper(&region);
        normalize::fix_page_log(&region);
        normalize::fix_local_links(&region, &|href| {
            links::link_to_new_page_file(href, pages, &self.space)
        });
        normalize::remove_page_title(&region);

        NormalizedContent {
            html: normalize::serialize_region(&region),
            needs_postprocess: note_fixed || warning_fixed || info_fixed || table_fixed,
        }
    }
}

/// Normalize a heading into a path-safe file name stem.
///
/// Path-unsafe characters are replaced with `_`. A `" - "` separator within
/// the first 10 characters is treated as a breadcrumb prefix and stripped
/// together with everything before it; a later separator is kept.
pub fn normalize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | '(' | ')' | ':' | ';' | '<' | '?' | '.' | '&' => '_',
            other => other,
        })
        .collect();

    const PREFIX_SEPARATOR: &str = " - ";
    match replaced.find(PREFIX_SEPARATOR) {
        Some(idx) if idx > 0 && idx < 10 => replaced[idx + PREFIX_SEPARATOR.len()..].to_string(),
        _ => replaced,
    }
}

fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Extract the page heading from the document title. Non-root pages carry a
/// `"<space title> : "` breadcrumb prefix, which is stripped.
fn extract_heading(document: &NodeRef, file_name: &str) -> String {
    let title = dom::select_first(document, "title")
        .map(|t| dom::text(&t))
        .unwrap_or_default();

    if file_name == INDEX_FILE_NAME {
        return title;
    }

    let breadcrumb_root = dom::select_first(document, "#breadcrumbs .first")
        .map(|n| dom::text(&n).trim().to_string())
        .unwrap_or_default();
    if breadcrumb_root.is_empty() {
        return title;
    }
    title.replace(&format!("{breadcrumb_root} : "), "")
}

// ---------------------------------------------------------------------------
// PageSet
// ---------------------------------------------------------------------------

/// The complete collection of pages for a run, read-only after the scan.
#[derive(Default)]
pub struct PageSet {
    pages: Vec<Page>,
    by_file_name: HashMap<String, usize>,
}

impl PageSet {
    /// Add a page. A later page with the same file name wins the lookup slot.
    pub fn push(&mut self, page: Page) {
        self.by_file_name
            .insert(page.file_name.clone(), self.pages.len());
        self.pages.push(page);
    }

    /// All pages in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Number of pages in the set.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Look up a page by its original file name.
    pub fn by_file_name(&self, file_name: &str) -> Option<&Page> {
        self.by_file_name.get(file_name).map(|&i| &self.pages[i])
    }

    /// Look up a page by its original base name (first match in scan order).
    pub fn by_base_name(&self, base_name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.file_base_name == base_name)
    }

    /// The last root (table-of-contents) page seen during the scan, if any.
    pub fn index_page(&self) -> Option<&Page> {
        self.pages.iter().rev().find(|p| p.is_index())
    }
}
