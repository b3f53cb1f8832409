//! Output file writing

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Artifacts;
use crate::config::{BLOG_DATA_FILE, BLOG_STATS_FILE, LEARNING_PATHS_FILE, POSTS_INDEX_FILE};
use crate::error::{PostIndexError, Result};

const OUTPUT_FILES: [&str; 4] = [
    POSTS_INDEX_FILE,
    BLOG_STATS_FILE,
    LEARNING_PATHS_FILE,
    BLOG_DATA_FILE,
];

/// Whether every generated file exists in `output_dir`
pub fn outputs_present(output_dir: &Path) -> bool {
    OUTPUT_FILES.iter().all(|name| output_dir.join(name).is_file())
}

/// Write all artifacts, creating `output_dir` if needed
///
/// Returns the written paths in a fixed order.
pub fn write_artifacts(output_dir: &Path, artifacts: &Artifacts) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| {
        PostIndexError::io_operation("create output directory", output_dir.display(), e)
    })?;

    let written = vec![
        write_json(&output_dir.join(POSTS_INDEX_FILE), &artifacts.index)?,
        write_json(&output_dir.join(BLOG_STATS_FILE), &artifacts.stats)?,
        write_json(
            &output_dir.join(LEARNING_PATHS_FILE),
            &artifacts.learning_paths,
        )?,
        write_json(&output_dir.join(BLOG_DATA_FILE), &artifacts.data)?,
    ];
    Ok(written)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content).map_err(|e| PostIndexError::io_operation("write", path.display(), e))?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(path.to_path_buf())
}
