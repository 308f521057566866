//! Grid reconstruction into literal pipe tables.
//!
//! The external renderer mangles the export's grid markup, so each grid is
//! rewritten up front into a literal pipe-table text block wrapped in a
//! `<pre class="table">` element the renderer passes through verbatim. The
//! post-render pass (`postprocess`) unwraps the resulting fenced block.

use kuchiki::NodeRef;
use tracing::debug;

use crate::dom;

/// Reconstruct every grid in the region. Returns whether at least one grid
/// produced a pipe-table block.
pub fn reconstruct_tables(region: &[NodeRef]) -> bool {
    let mut fixed = false;
    for root in region {
        for table in dom::select(root, "table") {
            match build_table_block(&table) {
                Some(block) => {
                    dom::replace_with_html(
                        &table,
                        &format!("<pre class=\"table\">{}</pre>", dom::escape_text(&block)),
                    );
                    fixed = true;
                }
                None => {
                    debug!("grid left unconverted (no rows or column-count mismatch)");
                }
            }
        }
    }
    fixed
}

/// Build the pipe-table text for one grid, or `None` when the grid has no
/// usable rows or a data row's cell count mismatches the established column
/// count (the grid is then left as-is; other grids are unaffected).
fn build_table_block(table: &NodeRef) -> Option<String> {
    let mut headers: Vec<String> = Vec::new();
    let mut data_rows: Vec<Vec<String>> = Vec::new();
    let mut col_count: Option<usize> = None;

    for row in dom::select(table, "tr") {
        let header_cells = dom::select(&row, "th");
        if !header_cells.is_empty() {
            headers.extend(header_cells.iter().map(cell_content));
            col_count = Some(header_cells.len());
        }

        let cells = dom::select(&row, "td");
        if !cells.is_empty() {
            match col_count {
                None => col_count = Some(cells.len()),
                Some(expected) if cells.len() != expected => return None,
                Some(_) => {}
            }
            data_rows.push(cells.iter().map(cell_content).collect());
        }
    }

    if headers.is_empty() && data_rows.is_empty() {
        return None;
    }
    let col_count = col_count?;

    let mut block = String::new();
    for i in 0..col_count {
        block.push_str("| ");
        block.push_str(headers.get(i).map(String::as_str).unwrap_or(""));
        block.push(' ');
    }
    block.push_str("|\n");

    block.push_str("| ");
    block.push_str(&vec!["----"; col_count].join(" | "));
    block.push_str(" |\n");

    for row in &data_rows {
        for cell in row {
            block.push_str("| ");
            block.push_str(cell);
            block.push(' ');
        }
        block.push_str("|\n");
    }

    Some(block)
}

/// Cell content: inner HTML, trimmed, with non-breaking-space and line-break
/// markers stripped.
fn cell_content(cell: &NodeRef) -> String {
    dom::inner_html(cell)
        .replace("&nbsp;", "")
        .replace("\u{a0}", "")
        .replace("<br>", "")
        .replace("<br/>", "")
        .trim()
        .to_string()
}
