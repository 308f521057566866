//! Link rewriter.
//!
//! Resolves an anchor's original href against the full page set: intra-export
//! links are retargeted to the new file names (extension stripped, the target
//! wiki infers it), cross-space links go through the target page's space path
//! template, and everything else is left untouched. A lookup miss is the
//! expected outcome for legitimate external links, never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::page::PageSet;

static PAGE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pageId=(\d+)").expect("valid regex"));

/// Resolve `href` to the corresponding new relative link, or `None` when the
/// href points outside the converted page set.
pub fn link_to_new_page_file(href: &str, pages: &PageSet, space: &str) -> Option<String> {
    let file_name = href.rsplit('/').next().unwrap_or(href);

    if let Some(base_name) = file_name.strip_suffix(".html") {
        // Relative link to an exported page file.
        let page = pages.by_base_name(base_name)?;
        let target = if page.space == space {
            &page.file_name_new
        } else {
            &page.space_path
        };
        return Some(strip_md_extension(target));
    }

    if let Some(caps) = PAGE_ID_RE.captures(href) {
        // Link through a numeric page-identifier query.
        let page = pages.by_base_name(&caps[1])?;
        return Some(strip_md_extension(&page.space_path));
    }

    // External URL, anchor fragment, mailto, ... — not ours to rewrite.
    None
}

fn strip_md_extension(name: &str) -> String {
    name.strip_suffix(".md").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use std::path::Path;

    fn page(path: &str, title: &str, breadcrumb: &str) -> Page {
        let markup = format!(
            "<html><head><title>{title}</title></head><body>\
             <div id=\"breadcrumbs\"><span class=\"first\">{breadcrumb}</span></div>\
             </body></html>"
        );
        Page::from_markup(Path::new(path), &markup).expect("page builds")
    }

    fn sample_set() -> PageSet {
        let mut set = PageSet::default();
        set.push(page("/export/DEV/Coding_Standards.html", "Development : Coding Standards", "Development"));
        set.push(page("/export/OPS/Runbook.html", "Operations : Runbook", "Operations"));
        set.push(page("/export/OPS/98765.html", "Operations : Legacy Page", "Operations"));
        set
    }

    #[test]
    fn same_space_link_uses_new_name_without_extension() {
        let set = sample_set();
        let link = link_to_new_page_file("Coding_Standards.html", &set, "DEV");
        assert_eq!(link.as_deref(), Some("Coding Standards"));
    }

    #[test]
    fn cross_space_link_uses_space_path() {
        let set = sample_set();
        let link = link_to_new_page_file("../OPS/Runbook.html", &set, "DEV");
        assert_eq!(link.as_deref(), Some("../OPS/Runbook"));
    }

    #[test]
    fn unknown_page_file_is_left_alone() {
        let set = sample_set();
        assert_eq!(link_to_new_page_file("Missing.html", &set, "DEV"), None);
    }

    #[test]
    fn page_id_query_resolves_through_space_path() {
        let set = sample_set();
        let link =
            link_to_new_page_file("/pages/viewpage.action?pageId=98765", &set, "DEV");
        assert_eq!(link.as_deref(), Some("../OPS/Legacy Page"));
    }

    #[test]
    fn unknown_page_id_is_left_alone() {
        let set = sample_set();
        assert_eq!(
            link_to_new_page_file("/pages/viewpage.action?pageId=424242", &set, "DEV"),
            None
        );
    }

    #[test]
    fn external_forms_are_left_alone() {
        let set = sample_set();
        for href in [
            "https://example.com/page",
            "#section-anchor",
            "mailto:dev@example.com",
            "ftp://files.example.com/a.tar",
        ] {
            assert_eq!(link_to_new_page_file(href, &set, "DEV"), None, "{href}");
        }
    }
}
