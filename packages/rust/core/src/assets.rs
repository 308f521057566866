//! Asset directory copying.

use std::path::Path;

use spacedown_shared::{Result, SpacedownError};

/// Asset subdirectories the export places next to its pages.
const ASSET_DIRS: &[&str] = &["images", "attachments"];

/// Copy known asset subdirectories of `page_dir` into `dir_out`.
/// A missing asset directory is not an error.
pub fn copy_assets(page_dir: &Path, dir_out: &Path) -> Result<()> {
    for asset in ASSET_DIRS {
        let src = page_dir.join(asset);
        if !src.is_dir() {
            continue;
        }
        copy_dir_recursive(&src, &dir_out.join(asset))?;
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| SpacedownError::io(dst, e))?;
    let entries = std::fs::read_dir(src).map_err(|e| SpacedownError::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SpacedownError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| SpacedownError::io(&from, e))?;
        }
    }
    Ok(())
}
