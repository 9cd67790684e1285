use std::path::{Path, PathBuf};

use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// Reduces an uploaded file name to something safe to use as a plain file name:
/// the name is NFKD-normalized and stripped to ASCII, `/` becomes whitespace,
/// whitespace runs collapse into `_`, everything outside `[A-Za-z0-9_.-]` is
/// dropped and leading/trailing `.`/`_` are stripped. Returns `None` when
/// nothing usable is left.
pub fn secure_filename(name: &str) -> Option<String> {
    let spaced: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Flat directory holding uploaded images, keyed by sanitized file name.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Writes `bytes` under the sanitized form of `original_name`, replacing any
    /// existing file with that name. Returns the stored name, or `None` if the
    /// name sanitized to nothing and no file was written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> anyhow::Result<Option<String>> {
        let Some(name) = secure_filename(original_name) else {
            info!(original_name, "upload name sanitized to nothing, skipping");
            return Ok(None);
        };

        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "saved upload");

        Ok(Some(name))
    }
}
