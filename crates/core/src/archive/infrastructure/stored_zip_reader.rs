use crate::archive::domain::archive_entry::ArchiveEntry;
use crate::archive::domain::archive_error::DecodeError;
use crate::archive::domain::archive_reader::ArchiveReader;

use super::crc32;
use super::zip_layout::{
    read_u32, LocalHeader, FLAG_DATA_DESCRIPTOR, LOCAL_HEADER_LEN, LOCAL_HEADER_SIGNATURE,
    METHOD_STORED,
};

/// Reads stored entries by walking local file headers from the start.
///
/// The central directory and end record are never consulted: the walk ends
/// at the first offset that does not hold a local header signature.
/// Entries using any compression method are stepped over, not decoded.
pub struct StoredZipReader {
    verify_checksums: bool,
}

impl StoredZipReader {
    pub fn new() -> Self {
        Self {
            verify_checksums: true,
        }
    }

    /// Disables CRC-32 verification of decoded entries.
    pub fn without_checksum_verification(mut self) -> Self {
        self.verify_checksums = false;
        self
    }

    fn decode_entry(
        &self,
        bytes: &[u8],
        cursor: usize,
    ) -> Result<(Option<ArchiveEntry>, usize), DecodeError> {
        let remaining = bytes.len() - cursor;
        let header = LocalHeader::parse(&bytes[cursor..]).ok_or(DecodeError::TruncatedHeader {
            offset: cursor,
            remaining,
            needed: LOCAL_HEADER_LEN,
        })?;

        let name_start = cursor + LOCAL_HEADER_LEN;
        let name_len = header.name_len as usize;
        let data_start = name_start + name_len + header.extra_len as usize;
        let data_len = header.data_len() as usize;
        let available = bytes.len() - name_start;
        let needed = (data_start - name_start) as u64 + data_len as u64;
        if needed > available as u64 {
            return Err(DecodeError::DataOutOfBounds {
                offset: cursor,
                needed,
                available,
            });
        }
        let data_end = data_start + data_len;

        if header.method != METHOD_STORED {
            log::debug!(
                "skipping entry at offset {cursor}: compression method {}",
                header.method
            );
            return Ok((None, data_end));
        }

        let name = std::str::from_utf8(&bytes[name_start..name_start + name_len])
            .map_err(|_| DecodeError::InvalidName { offset: cursor })?
            .to_string();
        let data = bytes[data_start..data_end].to_vec();

        if self.verify_checksums && header.flags & FLAG_DATA_DESCRIPTOR == 0 {
            let actual = crc32::checksum(&data);
            if actual != header.crc32 {
                return Err(DecodeError::ChecksumMismatch {
                    name,
                    expected: header.crc32,
                    actual,
                });
            }
        }

        log::debug!("read {name} ({data_len} bytes) at offset {cursor}");
        Ok((Some(ArchiveEntry { name, data }), data_end))
    }
}

impl Default for StoredZipReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveReader for StoredZipReader {
    fn read(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>, DecodeError> {
        let mut entries = Vec::new();
        let mut cursor = 0;

        // Anything other than a local header (directory, end record, or a
        // tail too short for a signature) ends the walk.
        while let Some(signature) = read_u32(bytes, cursor) {
            if signature != LOCAL_HEADER_SIGNATURE {
                break;
            }
            let (entry, next) = self.decode_entry(bytes, cursor)?;
            entries.extend(entry);
            cursor = next;
        }

        Ok(entries)
    }
}
