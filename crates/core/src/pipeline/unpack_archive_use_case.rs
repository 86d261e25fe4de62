use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::archive::domain::archive_error::DecodeError;
use crate::archive::domain::archive_reader::ArchiveReader;

#[derive(Error, Debug)]
pub enum UnpackError {
    #[error("corrupt archive: {0}")]
    Decode(#[from] DecodeError),
    #[error("refusing to extract entry with unsafe name: {0}")]
    UnsafeName(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Extracts every entry of an archive into a directory.
///
/// Entries must be plain file names; anything that could resolve outside
/// the output directory is rejected before a single file is written.
pub struct UnpackArchiveUseCase {
    reader: Box<dyn ArchiveReader>,
}

impl UnpackArchiveUseCase {
    pub fn new(reader: Box<dyn ArchiveReader>) -> Self {
        Self { reader }
    }

    /// Returns the written paths in archive order.
    pub fn execute(&self, archive: &[u8], out_dir: &Path) -> Result<Vec<PathBuf>, UnpackError> {
        let entries = self.reader.read(archive)?;

        if let Some(entry) = entries.iter().find(|e| !is_plain_file_name(&e.name)) {
            return Err(UnpackError::UnsafeName(entry.name.clone()));
        }

        fs::create_dir_all(out_dir).map_err(|e| UnpackError::Io {
            path: out_dir.to_path_buf(),
            source: e,
        })?;

        let mut written = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = out_dir.join(&entry.name);
            fs::write(&path, &entry.data).map_err(|e| UnpackError::Io {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("extracted {} ({} bytes)", path.display(), entry.data.len());
            written.push(path);
        }
        Ok(written)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
