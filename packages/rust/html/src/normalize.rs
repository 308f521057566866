//! Structural fix-up passes for wiki-export HTML.
//!
//! Each pass is a standalone tree transformation with a narrow selector-driven
//! precondition: it receives the selected content region explicitly, rewrites
//! one structural wart of the export markup, and is a no-op when nothing
//! matches. The fixed pass order lives with the page pipeline; later passes
//! assume earlier ones already ran (panels must become marked blockquotes
//! before the generic class stripping erases the marker-bearing wrapper).

use std::sync::LazyLock;

use kuchiki::NodeRef;
use regex::Regex;
use tracing::debug;

use crate::dom;

/// Marker placed at the start of a note blockquote, rewritten to `[!note]`
/// by the post-render pass. Chosen to survive the external renderer's escaping.
pub const NOTE_MARKER: &str = "==!note==";
/// Marker for warning panels.
pub const WARNING_MARKER: &str = "==!warning==";
/// Marker for info panels.
pub const INFO_MARKER: &str = "==!info==";

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Cleaned page content ready for the external renderer.
#[derive(Debug, Clone)]
pub struct NormalizedContent {
    /// Serialized HTML of the cleaned content region.
    pub html: String,
    /// Whether a fix-up fired that requires the post-render text pass
    /// (panel markers or a reconstructed table).
    pub needs_postprocess: bool,
}

// ---------------------------------------------------------------------------
// Pass 1: region selection
// ---------------------------------------------------------------------------

/// Select the substantive content region of a page, excluding chrome.
///
/// The root (table-of-contents) page keeps `#content` minus a stray table the
/// export embeds at the top. All other pages keep `#main-content` plus the
/// attachments and comments sections when present.
pub fn select_region(doc: &NodeRef, file_name: &str) -> Vec<NodeRef> {
    if file_name == "index.html" {
        let roots = dom::select(doc, "#content");
        for root in &roots {
            for stray in dom::select(root, "#main-content > .confluenceTable") {
                stray.detach();
            }
        }
        return roots;
    }

    let mut roots = dom::select(doc, "#main-content");
    for section in dom::select(doc, ".pageSection.group") {
        let wanted = dom::select_first(&section, ".pageSectionHeader > #attachments").is_some()
            || dom::select_first(&section, ".pageSectionHeader > #comments").is_some();
        if wanted {
            roots.push(section);
        }
    }
    roots
}

/// Serialize the region back to markup (concatenated inner HTML of its roots).
pub fn serialize_region(region: &[NodeRef]) -> String {
    let mut out = String::new();
    for root in region {
        out.push_str(&dom::inner_html(root));
    }
    out
}

// ---------------------------------------------------------------------------
// Passes 2–3: icon unwrapping
// ---------------------------------------------------------------------------

/// Unwrap icon spans nested inside headings to their text.
pub fn fix_headline(region: &[NodeRef]) {
    for root in region {
        for heading in dom::select(root, HEADING_SELECTOR) {
            for icon in dom::select(&heading, "span.aui-icon") {
                dom::replace_with_text(&icon);
            }
        }
    }
}

/// Unwrap inline icon spans anywhere else; icons carry no meaning in Markdown.
pub fn fix_icons(region: &[NodeRef]) {
    for root in region {
        for icon in dom::select(root, "span.aui-icon") {
            dom::replace_with_text(&icon);
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 4: empty links
// ---------------------------------------------------------------------------

/// Remove anchors with no visible text and no image child (heading anchors).
pub fn fix_empty_links(region: &[NodeRef]) {
    for root in region {
        for anchor in dom::select(root, "a") {
            if dom::text(&anchor).trim().is_empty()
                && dom::select_first(&anchor, "img").is_none()
            {
                anchor.detach();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 5: panel macros
// ---------------------------------------------------------------------------

fn marked_blockquote(marker: &str, body: &str) -> String {
    format!("<blockquote>{marker}<br>{body}</blockquote>")
}

/// Rewrite note panel macros to marked blockquotes. Returns whether any fired.
pub fn fix_note_panels(region: &[NodeRef]) -> bool {
    let mut fixed = false;
    for root in region {
        for content in dom::select(root, "div.panel > div.panelContent") {
            if dom::has_class(&content, "codeContent") {
                continue;
            }
            let body = dom::inner_html(&content);
            if let Some(panel) = content.parent() {
                dom::replace_with_html(&panel, &marked_blockquote(NOTE_MARKER, &body));
                fixed = true;
            }
        }
    }
    fixed
}

/// Rewrite warning panel macros to marked blockquotes. Returns whether any fired.
///
/// Recognition keys on the macro wrapper class: the kind-specific icon span
/// is already gone by the time this pass runs (the icon fix-up strips it).
pub fn fix_warning_panels(region: &[NodeRef]) -> bool {
    let mut fixed = false;
    for root in region {
        for macro_div in dom::select(root, "div.confluence-information-macro-note") {
            let body = dom::select_first(&macro_div, "div.confluence-information-macro-body")
                .map(|b| dom::inner_html(&b))
                .unwrap_or_default();
            dom::replace_with_html(&macro_div, &marked_blockquote(WARNING_MARKER, &body));
            fixed = true;
        }
    }
    fixed
}

/// Rewrite info panel macros to marked blockquotes. Returns whether any fired.
pub fn fix_info_panels(region: &[NodeRef]) -> bool {
    let mut fixed = false;
    for root in region {
        for macro_div in dom::select(root, "div.confluence-information-macro") {
            if dom::has_class(&macro_div, "confluence-information-macro-note") {
                // Warning kind, handled by its own pass.
                continue;
            }
            let body = dom::select_first(&macro_div, "div.confluence-information-macro-body")
                .map(|b| dom::inner_html(&b))
                .unwrap_or_default();
            dom::replace_with_html(&macro_div, &marked_blockquote(INFO_MARKER, &body));
            fixed = true;
        }
    }
    fixed
}

// ---------------------------------------------------------------------------
// Pass 6: link attributes
// ---------------------------------------------------------------------------

/// Keep only `href` on anchors; anchors without one unwrap to their text.
pub fn strip_link_attributes(region: &[NodeRef]) {
    for root in region {
        for anchor in dom::select(root, "a") {
            if dom::attr(&anchor, "href").is_some() {
                dom::retain_attr(&anchor, "href");
            } else {
                dom::replace_with_text(&anchor);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 7: empty headings
// ---------------------------------------------------------------------------

/// Remove headings whose text is empty after trimming.
pub fn fix_empty_headings(region: &[NodeRef]) {
    for root in region {
        for heading in dom::select(root, HEADING_SELECTOR) {
            if dom::text(&heading).trim().is_empty() {
                heading.detach();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 8: preformatted text
// ---------------------------------------------------------------------------

static BRUSH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"brush:\s*([A-Za-z0-9_+-]+)").expect("valid regex"));

/// Promote the syntax-highlighter language hint to a plain class name.
///
/// `<pre data-syntaxhighlighter-params="brush: php; …">` becomes
/// `<pre class="php">`; all other highlighter classes are dropped, and a
/// `pre` without a hint keeps no class at all.
pub fn fix_preformatted_text(region: &[NodeRef]) {
    for root in region {
        for pre in dom::select(root, "pre") {
            let params = dom::attr(&pre, "data-syntaxhighlighter-params");
            dom::remove_attr(&pre, "class");
            if let Some(params) = params {
                if let Some(caps) = BRUSH_RE.captures(&params) {
                    dom::set_attr(&pre, "class", &caps[1]);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 10: images wrapped in spans
// ---------------------------------------------------------------------------

/// Unwrap spans that contain only an image; the converter drops nested ones.
pub fn fix_image_within_span(region: &[NodeRef]) {
    for root in region {
        for span in dom::select(root, "span") {
            if dom::select_first(&span, "img").is_some()
                && dom::text(&span).trim().is_empty()
            {
                dom::unwrap_children(&span);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 11: image attributes
// ---------------------------------------------------------------------------

/// Strip export attributes from images without alt text and drop the
/// query string from their `src`.
pub fn strip_image_attributes(region: &[NodeRef]) {
    for root in region {
        for img in dom::select(root, "img") {
            let alt_empty = dom::attr(&img, "alt").is_none_or(|a| a.trim().is_empty());
            if !alt_empty {
                continue;
            }
            let Some(mut src) = dom::attr(&img, "src") else {
                continue;
            };
            if let Some(query) = src.find('?') {
                if query > 0 {
                    src.truncate(query);
                }
            }
            dom::retain_attr(&img, "src");
            dom::set_attr(&img, "src", &src);
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 12: decorative wrappers
// ---------------------------------------------------------------------------

/// Replace decorative inline wrappers (spans, user mentions) with their text.
pub fn replace_elements_with_text(region: &[NodeRef]) {
    for root in region {
        for node in dom::select(root, "span, .user-mention") {
            dom::replace_with_text(&node);
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 13: export-tool classes
// ---------------------------------------------------------------------------

static EXPORT_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(confluence-\S+|external-link|uri|tablesorter-header-inner|odd|even|header)$")
        .expect("valid regex")
});

/// Remove export-tool-specific class tokens from every element.
pub fn fix_arbitrary_classes(region: &[NodeRef]) {
    for root in region {
        for node in dom::select(root, "*") {
            let Some(classes) = dom::attr(&node, "class") else {
                continue;
            };
            let kept: Vec<&str> = classes
                .split_whitespace()
                .filter(|token| !EXPORT_CLASS_RE.is_match(token))
                .collect();
            if kept.is_empty() {
                dom::remove_attr(&node, "class");
            } else {
                dom::set_attr(&node, "class", &kept.join(" "));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Passes 14–15: attachment chrome and page log
// ---------------------------------------------------------------------------

/// Delete non-content widgets around file attachments.
pub fn fix_attachment_wrapper(region: &[NodeRef]) {
    const WIDGETS: &[&str] = &[
        ".attachment-buttons",
        ".plugin_attachments_upload_container",
        "table.attachments.aui",
    ];
    for root in region {
        for selector in WIDGETS {
            for node in dom::select(root, selector) {
                node.detach();
            }
        }
    }
}

/// Delete "recent activity" / "contributors" widgets with their section.
pub fn fix_page_log(region: &[NodeRef]) {
    for root in region {
        for node in dom::select(
            root,
            "[id$=\"Recentspaceactivity\"], [id$=\"Spacecontributors\"]",
        ) {
            if let Some(parent) = node.parent() {
                parent.detach();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 16: local links
// ---------------------------------------------------------------------------

/// Rewrite intra-export links through the given resolver.
///
/// Anchors without an `href` and "create new page" placeholders unwrap to
/// their text; an href the resolver maps is retargeted; anything else is
/// left untouched (external links are expected lookup misses, not errors).
pub fn fix_local_links(region: &[NodeRef], resolve: &dyn Fn(&str) -> Option<String>) {
    for root in region {
        for anchor in dom::select(root, "a") {
            let Some(href) = dom::attr(&anchor, "href") else {
                debug!(text = %dom::text(&anchor), "dropping anchor without href");
                dom::replace_with_text(&anchor);
                continue;
            };
            if dom::has_class(&anchor, "createlink") || href.contains("createpage.action") {
                // "create new page" placeholder: the target never existed.
                dom::replace_with_text(&anchor);
            } else if let Some(target) = resolve(&href) {
                dom::set_attr(&anchor, "href", &target);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 17: page title
// ---------------------------------------------------------------------------

/// Remove the page's own title heading; the title becomes the output file's
/// identity, not in-body content.
pub fn remove_page_title(region: &[NodeRef]) {
    for root in region {
        for heading in dom::select(root, "h1.title-heading") {
            heading.detach();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn region_of(markup: &str) -> (NodeRef, Vec<NodeRef>) {
        let doc = dom::parse_document(markup);
        let region = vec![doc.clone()];
        (doc, region)
    }

    #[test]
    fn fix_headline_unwraps_icon_in_heading() {
        let (doc, region) = region_of(
            "<h1 id=\"CodingStandards-x\"><span class=\"aui-icon\"></span>Odsadzovanie a šírka kódu</h1>",
        );
        fix_headline(&region);
        assert!(dom::select_first(&doc, "span.aui-icon").is_none());
        let h1 = dom::select_first(&doc, "h1").unwrap();
        assert_eq!(dom::text(&h1), "Odsadzovanie a šírka kódu");
    }

    #[test]
    fn fix_icons_keeps_surrounding_text() {
        let (doc, region) = region_of(
            "<div class=\"confluence-information-macro\">\
             <span class=\"aui-icon aui-icon-small aui-iconfont-info\"></span>\
             <div class=\"confluence-information-macro-body\"><p>čitatelnosť kódu</p></div></div>",
        );
        assert_eq!(dom::select(&doc, "span.aui-icon").len(), 1);
        fix_icons(&region);
        assert!(dom::select(&doc, "span.aui-icon").is_empty());
        assert_eq!(dom::text(&doc).trim(), "čitatelnosť kódu");
    }

    #[test]
    fn fix_icons_is_idempotent() {
        let (doc, region) = region_of("<p><span class=\"aui-icon\"></span>text</p>");
        fix_icons(&region);
        let first = serialize_region(&region);
        fix_icons(&region);
        assert_eq!(serialize_region(&region), first);
        assert_eq!(dom::text(&dom::select_first(&doc, "p").unwrap()), "text");
    }

    #[test]
    fn fix_empty_links_removes_bare_anchor() {
        let (doc, region) =
            region_of("<h1>foo<a name=\"HTML_v_templatech\" rel=\"nofollow\"></a></h1>");
        fix_empty_links(&region);
        assert!(dom::select(&doc, "a").is_empty());
        assert_eq!(dom::text(&dom::select_first(&doc, "h1").unwrap()), "foo");
    }

    #[test]
    fn fix_empty_links_keeps_text_anchor() {
        let (doc, region) =
            region_of("<h1>foo<a name=\"HTML_v_templatech\" rel=\"nofollow\">bar</a></h1>");
        fix_empty_links(&region);
        assert_eq!(dom::select(&doc, "a").len(), 1);
    }

    #[test]
    fn fix_empty_links_keeps_image_anchor() {
        let (doc, region) = region_of("<a href=\"x.html\"><img src=\"shot.png\"></a>");
        fix_empty_links(&region);
        assert_eq!(dom::select(&doc, "a").len(), 1);
    }

    #[test]
    fn note_panel_becomes_marked_blockquote() {
        let (doc, region) = region_of(
            "<div class=\"panel\"><div class=\"panelContent\"><p>watch out</p></div></div>",
        );
        let fixed = fix_note_panels(&region);
        assert!(fixed);
        assert!(dom::select(&doc, "div.panel").is_empty());
        let quote = dom::select_first(&doc, "blockquote").unwrap();
        assert!(dom::text(&quote).starts_with(NOTE_MARKER));
        assert!(dom::text(&quote).contains("watch out"));
    }

    #[test]
    fn note_panel_skips_code_panels() {
        let (_doc, region) = region_of(
            "<div class=\"panel\"><div class=\"panelContent codeContent\"><pre>x</pre></div></div>",
        );
        assert!(!fix_note_panels(&region));
    }

    #[test]
    fn info_panel_scenario() {
        // End-to-end scenario: info macro body survives behind the marker.
        let (doc, region) = region_of(
            "<div class=\"confluence-information-macro confluence-information-macro-information\">\
             <span class=\"aui-icon aui-icon-small aui-iconfont-info confluence-information-macro-icon\"></span>\
             <div class=\"confluence-information-macro-body\"><p>notice text</p></div></div>",
        );
        let fixed = fix_info_panels(&region);
        assert!(fixed);
        let quote = dom::select_first(&doc, "blockquote").unwrap();
        let text = dom::text(&quote);
        assert!(text.starts_with(INFO_MARKER));
        assert!(text.contains("notice text"));
    }

    #[test]
    fn warning_panel_becomes_marked_blockquote() {
        let (doc, region) = region_of(
            "<div class=\"confluence-information-macro confluence-information-macro-note\">\
             <div class=\"confluence-information-macro-body\"><p>beware</p></div></div>",
        );
        assert!(fix_warning_panels(&region));
        let quote = dom::select_first(&doc, "blockquote").unwrap();
        assert!(dom::text(&quote).starts_with(WARNING_MARKER));
        assert!(dom::text(&quote).contains("beware"));
    }

    #[test]
    fn info_pass_leaves_warning_macros_to_their_own_pass() {
        let (doc, region) = region_of(
            "<div class=\"confluence-information-macro confluence-information-macro-note\">\
             <div class=\"confluence-information-macro-body\"><p>beware</p></div></div>",
        );
        assert!(!fix_info_panels(&region));
        assert!(fix_warning_panels(&region));
        assert!(dom::text(&dom::select_first(&doc, "blockquote").unwrap())
            .starts_with(WARNING_MARKER));
    }

    #[test]
    fn panels_convert_after_icon_fixup_ran_first() {
        // Pipeline order: icons are unwrapped before the panel passes run.
        let (doc, region) = region_of(
            "<div class=\"confluence-information-macro confluence-information-macro-information\">\
             <span class=\"aui-icon aui-icon-small aui-iconfont-info\"></span>\
             <div class=\"confluence-information-macro-body\"><p>still converts</p></div></div>",
        );
        fix_icons(&region);
        assert!(fix_info_panels(&region));
        assert!(dom::text(&dom::select_first(&doc, "blockquote").unwrap())
            .contains("still converts"));
    }

    #[test]
    fn strip_link_attributes_keeps_only_href() {
        let (doc, region) = region_of(
            "<a href=\"page.html\" class=\"external-link\" rel=\"nofollow\" data-x=\"1\">label</a>",
        );
        strip_link_attributes(&region);
        let a = dom::select_first(&doc, "a").unwrap();
        assert_eq!(dom::attr(&a, "href").as_deref(), Some("page.html"));
        assert_eq!(dom::attr(&a, "rel"), None);
        assert_eq!(dom::attr(&a, "class"), None);
    }

    #[test]
    fn strip_link_attributes_unwraps_hrefless_anchor() {
        let (doc, region) = region_of("<p><a name=\"anchor\">label</a></p>");
        strip_link_attributes(&region);
        assert!(dom::select(&doc, "a").is_empty());
        assert_eq!(dom::text(&dom::select_first(&doc, "p").unwrap()), "label");
    }

    #[test]
    fn fix_empty_headings_removes_blank_ones() {
        let (doc, region) = region_of("<h2>   </h2><h2>kept</h2>");
        fix_empty_headings(&region);
        let headings = dom::select(&doc, "h2");
        assert_eq!(headings.len(), 1);
        assert_eq!(dom::text(&headings[0]), "kept");
    }

    #[test]
    fn preformatted_text_promotes_brush() {
        let (doc, region) = region_of(
            "<pre class=\"syntaxhighlighter-pre\" \
             data-syntaxhighlighter-params=\"brush: php; gutter: false; theme: Confluence\" \
             data-theme=\"Confluence\">echo \"foo\";</pre>",
        );
        fix_preformatted_text(&region);
        let pre = dom::select_first(&doc, "pre").unwrap();
        assert_eq!(dom::attr(&pre, "class").as_deref(), Some("php"));
    }

    #[test]
    fn preformatted_text_without_brush_gets_no_class() {
        let (doc, region) = region_of(
            "<pre class=\"syntaxhighlighter-pre\" data-theme=\"Confluence\">echo \"foo\";</pre>",
        );
        fix_preformatted_text(&region);
        let pre = dom::select_first(&doc, "pre").unwrap();
        assert_eq!(dom::attr(&pre, "class"), None);
    }

    #[test]
    fn image_within_span_is_unwrapped() {
        let (doc, region) =
            region_of("<p><a href=\"x\"><span><img src=\"pic.png\"></span></a></p>");
        fix_image_within_span(&region);
        assert!(dom::select(&doc, "span").is_empty());
        assert!(dom::select_first(&doc, "a > img").is_some());
    }

    #[test]
    fn image_within_span_keeps_captioned_span() {
        let (doc, region) = region_of("<span><img src=\"pic.png\">caption</span>");
        fix_image_within_span(&region);
        assert_eq!(dom::select(&doc, "span").len(), 1);
    }

    #[test]
    fn image_attributes_truncate_query_string() {
        let (doc, region) = region_of(
            "<img src=\"attachments/123/shot.png?version=2&amp;api=v2\" \
             data-image-src=\"x\" width=\"400\">",
        );
        strip_image_attributes(&region);
        let img = dom::select_first(&doc, "img").unwrap();
        assert_eq!(
            dom::attr(&img, "src").as_deref(),
            Some("attachments/123/shot.png")
        );
        assert_eq!(dom::attr(&img, "width"), None);
    }

    #[test]
    fn image_with_alt_text_is_untouched() {
        let (doc, region) = region_of("<img src=\"a.png?v=1\" alt=\"diagram\" width=\"400\">");
        strip_image_attributes(&region);
        let img = dom::select_first(&doc, "img").unwrap();
        assert_eq!(dom::attr(&img, "src").as_deref(), Some("a.png?v=1"));
        assert_eq!(dom::attr(&img, "width").as_deref(), Some("400"));
    }

    #[test]
    fn decorative_spans_collapse_to_text() {
        // End-to-end scenario: the classic exported headline markup.
        let (doc, region) = region_of("<h1><span class=\"mw-headline\">Title</span></h1>");
        replace_elements_with_text(&region);
        assert!(dom::select(&doc, "span").is_empty());
        assert_eq!(dom::text(&dom::select_first(&doc, "h1").unwrap()), "Title");
    }

    #[test]
    fn user_mentions_collapse_to_text() {
        let (doc, region) =
            region_of("<p>ping <b class=\"user-mention\">alice</b> please</p>");
        replace_elements_with_text(&region);
        assert!(dom::select(&doc, ".user-mention").is_empty());
        assert_eq!(dom::text(&dom::select_first(&doc, "p").unwrap()), "ping alice please");
    }

    #[test]
    fn arbitrary_classes_are_filtered() {
        let (doc, region) = region_of(
            "<table class=\"confluenceTable tablesorter\"><tbody>\
             <tr class=\"odd\"><td class=\"confluence-td keep-me\">x</td></tr>\
             </tbody></table>",
        );
        fix_arbitrary_classes(&region);
        let table = dom::select_first(&doc, "table").unwrap();
        assert_eq!(dom::attr(&table, "class").as_deref(), Some("tablesorter"));
        let tr = dom::select_first(&doc, "tr").unwrap();
        assert_eq!(dom::attr(&tr, "class"), None);
        let td = dom::select_first(&doc, "td").unwrap();
        assert_eq!(dom::attr(&td, "class").as_deref(), Some("keep-me"));
    }

    #[test]
    fn attachment_chrome_is_removed() {
        let (doc, region) = region_of(
            "<div class=\"attachment-buttons\"><button>upload</button></div>\
             <div class=\"plugin_attachments_upload_container\"></div>\
             <table class=\"attachments aui\"><tbody><tr><td>f.pdf</td></tr></tbody></table>\
             <p>kept</p>",
        );
        fix_attachment_wrapper(&region);
        assert!(dom::select(&doc, ".attachment-buttons").is_empty());
        assert!(dom::select(&doc, "table").is_empty());
        assert!(dom::select_first(&doc, "p").is_some());
    }

    #[test]
    fn page_log_removes_containing_section() {
        let (doc, region) = region_of(
            "<div class=\"section\"><h2 id=\"Space-Recentspaceactivity\">Recent activity</h2>\
             <ul><li>edit</li></ul></div><p>kept</p>",
        );
        fix_page_log(&region);
        assert!(dom::select(&doc, ".section").is_empty());
        assert!(dom::select_first(&doc, "p").is_some());
    }

    #[test]
    fn local_links_use_resolver() {
        let (doc, region) = region_of(
            "<a href=\"Other_Page.html\">other</a>\
             <a href=\"https://example.com/x\">ext</a>\
             <a class=\"createlink\" href=\"new.html\">missing</a>",
        );
        fix_local_links(&region, &|href| {
            (href == "Other_Page.html").then(|| "Other_Page".to_string())
        });
        let anchors = dom::select(&doc, "a");
        assert_eq!(anchors.len(), 2);
        assert_eq!(dom::attr(&anchors[0], "href").as_deref(), Some("Other_Page"));
        assert_eq!(
            dom::attr(&anchors[1], "href").as_deref(),
            Some("https://example.com/x")
        );
        assert!(dom::text(&doc).contains("missing"));
    }

    #[test]
    fn page_title_heading_is_removed() {
        let (doc, region) =
            region_of("<h1 class=\"title-heading\">Space : Page</h1><h2>body heading</h2>");
        remove_page_title(&region);
        assert!(dom::select(&doc, "h1").is_empty());
        assert!(dom::select_first(&doc, "h2").is_some());
    }

    #[test]
    fn region_selection_for_content_page() {
        let doc = dom::parse_document(
            "<div id=\"page\"><div id=\"main-content\"><p>body</p></div>\
             <div class=\"pageSection group\">\
             <div class=\"pageSectionHeader\"><h2 id=\"attachments\">Attachments</h2></div></div>\
             <div class=\"pageSection group\">\
             <div class=\"pageSectionHeader\"><h2 id=\"unrelated\">Other</h2></div></div></div>",
        );
        let region = select_region(&doc, "Some_Page.html");
        assert_eq!(region.len(), 2);
    }

    #[test]
    fn region_selection_for_index_drops_stray_table() {
        let doc = dom::parse_document(
            "<div id=\"content\"><div id=\"main-content\">\
             <table class=\"confluenceTable\"><tbody><tr><td>stray</td></tr></tbody></table>\
             <ul><li><a href=\"A.html\">A</a></li></ul></div></div>",
        );
        let region = select_region(&doc, "index.html");
        assert_eq!(region.len(), 1);
        assert!(dom::select(&region[0], "table").is_empty());
        assert_eq!(dom::select(&region[0], "a").len(), 1);
    }
}
