//! Navigation resolver.
//!
//! Walks the root page's nested table-of-contents list to compute, for every
//! referenced page, the output directory it belongs to. The export encodes
//! hierarchy purely through list nesting: a list item that is "just a link"
//! is a leaf page living in its parent chapter's directory, while a link that
//! also contains a sub-list is a chapter page owning a directory named after
//! itself.

use std::collections::HashMap;

use kuchiki::NodeRef;
use tracing::debug;

use spacedown_html::dom;

use crate::page::{INDEX_FILE_NAME, Page, normalize_file_name};

/// Mapping from an original page href to its output directory path
/// (`""` = top-level). A page absent from the map defaults to top-level.
pub type NavigationMap = HashMap<String, String>;

/// Build the navigation map from the root page's table-of-contents list.
///
/// The root page itself is always mapped to the top level, overriding any
/// conflicting entry produced by the walk.
pub fn map_pages_to_paths(index_page: &Page) -> NavigationMap {
    let mut dir_by_href = NavigationMap::new();

    if let Some(toc) = dom::select_first(index_page.document(), "div > ul > li") {
        map_node(&toc, &mut dir_by_href, "");
    } else {
        debug!("root page has no table-of-contents list");
    }

    dir_by_href.insert(INDEX_FILE_NAME.to_string(), String::new());
    dir_by_href
}

/// Recursive descent over one list node. Accumulators are explicit: the
/// in-progress map and the current path come in, the chapter flag goes out.
///
/// Returns whether this node represents a chapter: it registered a link, or
/// any of its nested lists reported being one.
fn map_node(node: &NodeRef, dir_by_href: &mut NavigationMap, current_path: &str) -> bool {
    let mut link_href: Option<String> = None;
    let mut link_text = String::new();
    let mut is_chapter = false;

    for child in node.children() {
        let Some(tag) = dom::tag_name(&child) else {
            continue;
        };
        match tag.as_str() {
            "a" => {
                link_href = dom::attr(&child, "href");
                link_text = normalize_file_name(&dom::text(&child)).trim().to_string();
            }
            "ul" | "li" => {
                let nested_path = if link_text.is_empty() {
                    current_path.to_string()
                } else {
                    join_path(current_path, &link_text)
                };
                is_chapter |= map_node(&child, dir_by_href, &nested_path);
            }
            _ => {}
        }
    }

    let has_link = link_href.is_some();
    if let Some(href) = link_href {
        let destination = if is_chapter {
            join_path(current_path, &link_text)
        } else {
            current_path.to_string()
        };
        dir_by_href.insert(href, destination);
    }

    has_link || is_chapter
}

fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}/{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn index_page(toc_markup: &str) -> Page {
        let markup = format!(
            "<html><head><title>Dev</title></head><body><div id=\"content\">\
             <div>{toc_markup}</div></div></body></html>"
        );
        Page::from_markup(Path::new("/export/DEV/index.html"), &markup).expect("index page")
    }

    #[test]
    fn leaf_links_land_in_parent_directory() {
        let page = index_page(
            "<ul><li>\
             <a href=\"Guide.html\">Guide</a>\
             <ul>\
             <li><a href=\"Install.html\">Install</a></li>\
             <li><a href=\"Usage.html\">Usage</a></li>\
             </ul>\
             </li></ul>",
        );
        let map = map_pages_to_paths(&page);

        // The chapter page owns a directory named after itself; its leaves
        // live inside that directory, not in directories of their own.
        assert_eq!(map.get("Guide.html").map(String::as_str), Some("Guide"));
        assert_eq!(map.get("Install.html").map(String::as_str), Some("Guide"));
        assert_eq!(map.get("Usage.html").map(String::as_str), Some("Guide"));
    }

    #[test]
    fn nested_chapters_extend_the_path() {
        let page = index_page(
            "<ul><li>\
             <a href=\"Guide.html\">Guide</a>\
             <ul><li>\
             <a href=\"Advanced.html\">Advanced</a>\
             <ul><li><a href=\"Tuning.html\">Tuning</a></li></ul>\
             </li></ul>\
             </li></ul>",
        );
        let map = map_pages_to_paths(&page);

        assert_eq!(map.get("Guide.html").map(String::as_str), Some("Guide"));
        assert_eq!(
            map.get("Advanced.html").map(String::as_str),
            Some("Guide/Advanced")
        );
        assert_eq!(
            map.get("Tuning.html").map(String::as_str),
            Some("Guide/Advanced")
        );
    }

    #[test]
    fn every_href_appears_exactly_once() {
        let page = index_page(
            "<ul><li>\
             <a href=\"A.html\">A</a>\
             <ul>\
             <li><a href=\"B.html\">B</a></li>\
             <li><a href=\"C.html\">C</a>\
             <ul><li><a href=\"D.html\">D</a></li></ul></li>\
             </ul>\
             </li></ul>",
        );
        let map = map_pages_to_paths(&page);

        // A, B, C, D plus the root page entry.
        assert_eq!(map.len(), 5);
        for href in ["A.html", "B.html", "C.html", "D.html"] {
            assert!(map.contains_key(href), "missing {href}");
        }
    }

    #[test]
    fn root_page_always_maps_to_top_level() {
        let page = index_page(
            "<ul><li><a href=\"index.html\">Overview</a>\
             <ul><li><a href=\"Child.html\">Child</a></li></ul></li></ul>",
        );
        let map = map_pages_to_paths(&page);
        assert_eq!(map.get("index.html").map(String::as_str), Some(""));
    }

    #[test]
    fn chapter_flag_survives_a_trailing_leaf_sibling() {
        // The second nested list is a plain leaf; the first one made this
        // node a chapter, and that must not be forgotten.
        let page = index_page(
            "<ul><li>\
             <a href=\"Parent.html\">Parent</a>\
             <ul><li><a href=\"Sub.html\">Sub</a>\
             <ul><li><a href=\"Deep.html\">Deep</a></li></ul></li></ul>\
             <ul><li><span>no link here</span></li></ul>\
             </li></ul>",
        );
        let map = map_pages_to_paths(&page);
        assert_eq!(map.get("Parent.html").map(String::as_str), Some("Parent"));
        assert_eq!(map.get("Sub.html").map(String::as_str), Some("Parent/Sub"));
    }

    #[test]
    fn link_text_is_normalized_for_directory_names() {
        let page = index_page(
            "<ul><li>\
             <a href=\"Setup.html\">Setup (v2)</a>\
             <ul><li><a href=\"Step.html\">Step</a></li></ul>\
             </li></ul>",
        );
        let map = map_pages_to_paths(&page);
        assert_eq!(map.get("Step.html").map(String::as_str), Some("Setup _v2_"));
    }

    #[test]
    fn missing_toc_yields_only_the_root_entry() {
        let page = Page::from_markup(
            Path::new("/export/DEV/index.html"),
            "<html><head><title>Dev</title></head><body><p>no list</p></body></html>",
        )
        .expect("page");
        let map = map_pages_to_paths(&page);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("index.html").map(String::as_str), Some(""));
    }
}
