//! The downloadable `.mm` artifact.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use mindscribe_shared::{
    AppConfig, DEFAULT_FILE_NAME, FREEMIND_MIME_TYPE, MindscribeError, Result,
};

use crate::freemind::{MindMapOptions, serialize_with};
use crate::outline::{OutlineOptions, parse_with};

/// A serialized mind map ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindMapFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// Settings for [`build_download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub outline: OutlineOptions,
    pub mindmap: MindMapOptions,
    pub file_name: String,
    pub mime_type: String,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            outline: OutlineOptions::default(),
            mindmap: MindMapOptions::default(),
            file_name: DEFAULT_FILE_NAME.into(),
            mime_type: FREEMIND_MIME_TYPE.into(),
        }
    }
}

impl From<&AppConfig> for DownloadOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            outline: OutlineOptions::from(config),
            mindmap: MindMapOptions::from(config),
            file_name: config.mindmap.file_name.clone(),
            mime_type: config.mindmap.mime_type.clone(),
        }
    }
}

/// Whether `outline` is mind-map notation that can be downloaded.
pub fn is_downloadable(outline: &str, opts: &OutlineOptions) -> bool {
    outline
        .trim_start()
        .starts_with(opts.start_marker.as_str())
}

/// Parse and serialize `outline` into a downloadable file.
#[instrument(skip_all, fields(file = %opts.file_name))]
pub fn build_download(outline: &str, opts: &DownloadOptions) -> Result<MindMapFile> {
    let tree = parse_with(outline, &opts.outline);
    let contents = serialize_with(&tree, &opts.mindmap)?;

    Ok(MindMapFile {
        file_name: opts.file_name.clone(),
        mime_type: opts.mime_type.clone(),
        contents,
    })
}

impl MindMapFile {
    /// Write the file into `dir`, returning its path.
    ///
    /// Contents go to a temporary sibling first and are renamed into place,
    /// so a failed write leaves no partial `.mm` file behind.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        let tmp = dir.join(format!(".{}.tmp", self.file_name));

        if let Err(e) = std::fs::write(&tmp, self.contents.as_bytes()) {
            let _ = std::fs::remove_file(&tmp);
            return Err(MindscribeError::io(&tmp, e));
        }
        if let Err(e) = std::fs::rename(&tmp, &path) {
            warn!(?tmp, error = %e, "could not move mind map into place");
            let _ = std::fs::remove_file(&tmp);
            return Err(MindscribeError::io(&path, e));
        }

        info!(?path, bytes = self.contents.len(), mime = %self.mime_type, "mind map written");
        Ok(path)
    }
}
