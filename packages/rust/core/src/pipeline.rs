//! End-to-end conversion pipeline: scan → page set → navigation → convert.
//!
//! Single-threaded by design: one page is processed fully before the next
//! begins, and the page set plus navigation map are built completely before
//! the first conversion, since link and path resolution need the whole set.
//! Rendering is awaited per page; a page only counts as converted once the
//! renderer's outcome has been observed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use spacedown_html::postprocess;
use spacedown_shared::{Result, SpacedownError};

use crate::assets;
use crate::discover;
use crate::nav::{self, NavigationMap};
use crate::page::{Page, PageSet};
use crate::render::{HtmdRenderer, Renderer};

/// Configuration for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory with the exported HTML tree (or a single file).
    pub dir_in: PathBuf,
    /// Directory where the Markdown tree is generated.
    pub dir_out: PathBuf,
}

/// Result of a conversion run that reached the "conversion done" milestone.
#[derive(Debug)]
pub struct ConvertResult {
    /// Pages found in the input tree (root pages included).
    pub pages_total: usize,
    /// Pages successfully rendered.
    pub pages_converted: usize,
    /// Pages whose rendering failed (logged, run continued).
    pub pages_failed: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a page has been converted.
    fn page_converted(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_converted(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Run the full conversion.
///
/// 1. Discover source files and build the page set
/// 2. Resolve the navigation map from the root page
/// 3. Convert every non-root page (render awaited, post-process, copy assets)
pub fn convert(
    config: &ConvertConfig,
    renderer: Box<dyn Renderer>,
    progress: &dyn ProgressReporter,
) -> Result<ConvertResult> {
    let start = Instant::now();
    let mut renderer = renderer;

    info!(dir_in = %config.dir_in.display(), "parsing files");
    progress.phase("Parsing files");

    let file_paths = discover::source_files(&config.dir_in)?;
    info!(count = file_paths.len(), "found source files");

    let mut pages = PageSet::default();
    for path in &file_paths {
        if path.extension().is_some_and(|ext| ext == "html") {
            pages.push(Page::load(path)?);
        }
    }

    progress.phase("Resolving navigation");
    let dir_by_path: NavigationMap = match pages.index_page() {
        Some(index) => nav::map_pages_to_paths(index),
        None => {
            warn!("no root page found, placing all pages at the top level");
            NavigationMap::new()
        }
    };

    progress.phase("Converting pages");
    let mut result = ConvertResult {
        pages_total: pages.len(),
        pages_converted: 0,
        pages_failed: 0,
        elapsed: start.elapsed(),
    };

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        if page.is_index() {
            // The root page only contributes its navigation structure.
            debug!(path = %page.path.display(), "skipping root page content");
            continue;
        }

        match convert_page(page, &pages, &dir_by_path, config, renderer.as_ref()) {
            Ok(()) => {
                result.pages_converted += 1;
                progress.page_converted(&page.file_name_new, i + 1, total);
            }
            Err(SpacedownError::RendererUnavailable(msg)) => {
                warn!(%msg, "external renderer unavailable, falling back to in-process rendering");
                renderer = Box::new(HtmdRenderer);
                match convert_page(page, &pages, &dir_by_path, config, renderer.as_ref()) {
                    Ok(()) => {
                        result.pages_converted += 1;
                        progress.page_converted(&page.file_name_new, i + 1, total);
                    }
                    Err(e) => {
                        error!(path = %page.path.display(), error = %e, "page conversion failed");
                        result.pages_failed += 1;
                    }
                }
            }
            Err(e @ SpacedownError::Io { .. }) => return Err(e),
            Err(e) => {
                error!(path = %page.path.display(), error = %e, "page conversion failed");
                result.pages_failed += 1;
            }
        }
    }

    result.elapsed = start.elapsed();
    info!(
        pages_total = result.pages_total,
        pages_converted = result.pages_converted,
        pages_failed = result.pages_failed,
        elapsed_ms = result.elapsed.as_millis(),
        "conversion done"
    );
    progress.done(&result);

    Ok(result)
}

/// Convert one page: normalize, render (blocking), post-process, copy assets.
fn convert_page(
    page: &Page,
    pages: &PageSet,
    dir_by_path: &NavigationMap,
    config: &ConvertConfig,
    renderer: &dyn Renderer,
) -> Result<()> {
    info!(path = %page.path.display(), "parsing page");
    let content = page.text_to_convert(pages);

    let out_path = output_path(page, dir_by_path, &config.dir_out);
    info!(out = %out_path.display(), renderer = renderer.name(), "making markdown");

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SpacedownError::io(parent, e))?;
    }

    renderer.render(&content.html, &out_path)?;

    if content.needs_postprocess {
        let rendered =
            std::fs::read_to_string(&out_path).map_err(|e| SpacedownError::io(&out_path, e))?;
        let processed = postprocess::run(&rendered);
        std::fs::write(&out_path, processed).map_err(|e| SpacedownError::io(&out_path, e))?;
    }

    if let Some(page_dir) = page.path.parent() {
        if let Err(e) = assets::copy_assets(page_dir, &config.dir_out) {
            warn!(error = %e, "asset copy failed");
        }
    }

    Ok(())
}

/// Where a page lands in the output tree: `<out>/<space>/<toc path>/<new name>`.
/// Pages unknown to the navigation map default to the top of their space.
fn output_path(page: &Page, dir_by_path: &NavigationMap, dir_out: &Path) -> PathBuf {
    let mut out = dir_out.join(&page.space);
    if let Some(rel) = dir_by_path.get(&page.file_name) {
        if !rel.is_empty() {
            out = out.join(rel);
        }
    }
    out.join(&page.file_name_new)
}
