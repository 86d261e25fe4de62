use super::archive_entry::ArchiveEntry;
use super::archive_error::UnsupportedInputError;

/// Serialises an ordered batch of entries into one archive.
pub trait ArchiveWriter: Send {
    /// Output layout follows `entries` order exactly.
    fn write(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, UnsupportedInputError>;
}
