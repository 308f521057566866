//! Source file discovery.

use std::path::{Path, PathBuf};

use spacedown_shared::{Result, SpacedownError};

/// Return every file under `root`, recursively, files only. A file path
/// input returns just itself. Entries are sorted for a deterministic run.
pub fn source_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| SpacedownError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SpacedownError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
