//! Handing the encoded calendar to whatever saves it.

use std::path::{Path, PathBuf};

use crate::error::PlanningResult;

pub const DEFAULT_EXPORT_FILENAME: &str = "planning.ics";

/// Persists an exported calendar.
pub trait ExportSink: Send + Sync {
    /// Save `contents` under (or near) `filename`. Returns where it ended up.
    fn save(&self, filename: &str, contents: &str) -> PlanningResult<PathBuf>;
}

/// Writes exports into a directory.
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileExportSink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FileExportSink {
    fn save(&self, filename: &str, contents: &str) -> PlanningResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        // Only keep the last path component of the suggested name
        let filename = Path::new(filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.into());

        let path = self.dir.join(&filename);
        let temp = self.dir.join(format!(".{}.tmp", filename.to_string_lossy()));

        std::fs::write(&temp, contents)?;
        std::fs::rename(&temp, &path)?;

        tracing::info!(path = %path.display(), bytes = contents.len(), "Exported planning");
        Ok(path)
    }
}
