use super::archive_entry::ArchiveEntry;
use super::archive_error::DecodeError;

/// Unpacks archive bytes into entries, in the order they appear.
pub trait ArchiveReader: Send {
    fn read(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>, DecodeError>;
}
