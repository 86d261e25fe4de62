use std::collections::HashSet;

use crate::archive::domain::archive_entry::ArchiveEntry;
use crate::archive::domain::archive_error::UnsupportedInputError;
use crate::archive::domain::archive_writer::ArchiveWriter;

use super::crc32;
use super::zip_layout::{
    push_central_directory_record, push_end_record, push_local_header, EntryFields,
    CENTRAL_DIRECTORY_RECORD_LEN, END_RECORD_LEN, FLAG_UTF8_NAME, LOCAL_HEADER_LEN,
    MAX_ENTRY_COUNT, MAX_FIELD_VALUE, MAX_NAME_LEN,
};

/// Writes a ZIP archive whose entries are all stored verbatim (method 0).
///
/// Payloads are already-compressed images, so deflating would save little;
/// stored entries let the reading side walk local headers with no
/// decompressor.
pub struct StoredZipWriter;

impl StoredZipWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoredZipWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte sizes of the three archive sections, computed ahead of writing.
struct Layout {
    directory_offset: u64,
    directory_len: u64,
}

impl Layout {
    fn total_len(&self) -> u64 {
        self.directory_offset + self.directory_len + END_RECORD_LEN as u64
    }
}

fn plan(entries: &[ArchiveEntry]) -> Result<Layout, UnsupportedInputError> {
    if entries.len() > MAX_ENTRY_COUNT {
        return Err(UnsupportedInputError::TooManyEntries {
            count: entries.len(),
            limit: MAX_ENTRY_COUNT,
        });
    }

    let mut seen = HashSet::with_capacity(entries.len());
    let mut directory_offset: u64 = 0;
    let mut directory_len: u64 = 0;

    for entry in entries {
        let name_len = entry.name.len();
        if name_len == 0 {
            return Err(UnsupportedInputError::EmptyName);
        }
        if name_len > MAX_NAME_LEN {
            return Err(UnsupportedInputError::NameTooLong {
                name: entry.name.clone(),
                len: name_len,
                limit: MAX_NAME_LEN,
            });
        }
        if entry.data.len() as u64 > MAX_FIELD_VALUE {
            return Err(UnsupportedInputError::DataTooLarge {
                name: entry.name.clone(),
                len: entry.data.len(),
                limit: MAX_FIELD_VALUE,
            });
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(UnsupportedInputError::DuplicateName(entry.name.clone()));
        }

        // Every local header must start at an offset that fits in 32 bits.
        if directory_offset > MAX_FIELD_VALUE {
            return Err(UnsupportedInputError::ArchiveTooLarge {
                len: directory_offset,
                limit: MAX_FIELD_VALUE,
            });
        }
        directory_offset += (LOCAL_HEADER_LEN + name_len) as u64 + entry.data.len() as u64;
        directory_len += (CENTRAL_DIRECTORY_RECORD_LEN + name_len) as u64;
    }

    let layout = Layout {
        directory_offset,
        directory_len,
    };
    if directory_offset > MAX_FIELD_VALUE || directory_len > MAX_FIELD_VALUE {
        return Err(UnsupportedInputError::ArchiveTooLarge {
            len: layout.total_len(),
            limit: MAX_FIELD_VALUE,
        });
    }
    Ok(layout)
}

fn entry_fields(entry: &ArchiveEntry) -> EntryFields {
    let flags = if entry.name.is_ascii() { 0 } else { FLAG_UTF8_NAME };
    EntryFields {
        flags,
        crc32: crc32::checksum(&entry.data),
        // Both bounds were checked by `plan`.
        size: entry.data.len() as u32,
        name_len: entry.name.len() as u16,
    }
}

impl ArchiveWriter for StoredZipWriter {
    fn write(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, UnsupportedInputError> {
        let layout = plan(entries)?;
        let mut out = Vec::with_capacity(layout.total_len() as usize);

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let local_offset = out.len() as u32;
            let fields = entry_fields(entry);
            push_local_header(&mut out, &fields);
            out.extend_from_slice(entry.name.as_bytes());
            out.extend_from_slice(&entry.data);
            log::debug!(
                "stored {} ({} bytes, crc {:#010x}) at offset {local_offset}",
                entry.name,
                fields.size,
                fields.crc32
            );
            records.push((fields, local_offset));
        }

        let directory_offset = out.len() as u32;
        for (entry, (fields, local_offset)) in entries.iter().zip(&records) {
            push_central_directory_record(&mut out, fields, *local_offset);
            out.extend_from_slice(entry.name.as_bytes());
        }
        let directory_len = out.len() as u32 - directory_offset;

        push_end_record(
            &mut out,
            entries.len() as u16,
            directory_len,
            directory_offset,
        );

        debug_assert_eq!(out.len() as u64, layout.total_len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::infrastructure::zip_layout::{
        read_u16, read_u32, CENTRAL_DIRECTORY_SIGNATURE, END_OF_CENTRAL_DIRECTORY_SIGNATURE,
        LOCAL_HEADER_SIGNATURE,
    };

    fn write(entries: &[ArchiveEntry]) -> Vec<u8> {
        StoredZipWriter::new().write(entries).unwrap()
    }

    fn two_entries() -> Vec<ArchiveEntry> {
        vec![
            ArchiveEntry::new("a.png", vec![1; 10]),
            ArchiveEntry::new("b.png", vec![2; 20]),
        ]
    }

    #[test]
    fn test_empty_archive_is_only_end_record() {
        let bytes = write(&[]);
        assert_eq!(bytes.len(), END_RECORD_LEN);
        assert_eq!(read_u32(&bytes, 0), Some(END_OF_CENTRAL_DIRECTORY_SIGNATURE));
        assert_eq!(read_u16(&bytes, 10), Some(0));
        assert_eq!(read_u32(&bytes, 12), Some(0));
        assert_eq!(read_u32(&bytes, 16), Some(0));
    }

    #[test]
    fn test_two_entry_layout() {
        let bytes = write(&two_entries());

        // a.png: header at 0, name at 30, data at 35..45
        assert_eq!(read_u32(&bytes, 0), Some(LOCAL_HEADER_SIGNATURE));
        assert_eq!(read_u16(&bytes, 8), Some(0));
        assert_eq!(read_u32(&bytes, 18), Some(10));
        assert_eq!(read_u32(&bytes, 22), Some(10));
        assert_eq!(read_u16(&bytes, 26), Some(5));
        assert_eq!(&bytes[30..35], b"a.png");
        assert_eq!(&bytes[35..45], &[1; 10]);

        // b.png: header at 45, name at 75, data at 80..100
        assert_eq!(read_u32(&bytes, 45), Some(LOCAL_HEADER_SIGNATURE));
        assert_eq!(read_u32(&bytes, 45 + 18), Some(20));
        assert_eq!(&bytes[75..80], b"b.png");
        assert_eq!(&bytes[80..100], &[2; 20]);

        // directory: two 51-byte records starting right after b.png's data
        assert_eq!(read_u32(&bytes, 100), Some(CENTRAL_DIRECTORY_SIGNATURE));
        assert_eq!(read_u32(&bytes, 100 + 42), Some(0));
        assert_eq!(&bytes[146..151], b"a.png");
        assert_eq!(read_u32(&bytes, 151), Some(CENTRAL_DIRECTORY_SIGNATURE));
        assert_eq!(read_u32(&bytes, 151 + 42), Some(45));
        assert_eq!(&bytes[197..202], b"b.png");

        // end record
        assert_eq!(read_u32(&bytes, 202), Some(END_OF_CENTRAL_DIRECTORY_SIGNATURE));
        assert_eq!(read_u16(&bytes, 202 + 8), Some(2));
        assert_eq!(read_u16(&bytes, 202 + 10), Some(2));
        assert_eq!(read_u32(&bytes, 202 + 12), Some(102));
        assert_eq!(read_u32(&bytes, 202 + 16), Some(100));
        assert_eq!(bytes.len(), 224);
    }

    #[test]
    fn test_header_and_directory_carry_checksum() {
        let bytes = write(&two_entries());
        let expected = crc32::checksum(&[1; 10]);
        assert_eq!(read_u32(&bytes, 14), Some(expected));
        assert_eq!(read_u32(&bytes, 100 + 16), Some(expected));
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(write(&two_entries()), write(&two_entries()));
    }

    #[test]
    fn test_entry_order_determines_layout() {
        let mut reversed = two_entries();
        reversed.reverse();
        let bytes = write(&reversed);
        assert_eq!(&bytes[30..35], b"b.png");
    }

    #[test]
    fn test_utf8_flag_only_for_non_ascii_names() {
        let bytes = write(&[
            ArchiveEntry::new("plain.png", vec![]),
            ArchiveEntry::new("café.png", vec![]),
        ]);
        assert_eq!(read_u16(&bytes, 6), Some(0));
        let second = LOCAL_HEADER_LEN + "plain.png".len();
        assert_eq!(read_u16(&bytes, second + 6), Some(FLAG_UTF8_NAME));
    }

    #[test]
    fn test_empty_data_entry() {
        let bytes = write(&[ArchiveEntry::new("empty.png", vec![])]);
        assert_eq!(read_u32(&bytes, 14), Some(0));
        assert_eq!(read_u32(&bytes, 18), Some(0));
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = StoredZipWriter::new()
            .write(&[ArchiveEntry::new("", vec![1])])
            .unwrap_err();
        assert_eq!(err, UnsupportedInputError::EmptyName);
    }

    #[test]
    fn test_rejects_name_over_field_width() {
        let name = "n".repeat(MAX_NAME_LEN + 1);
        let err = StoredZipWriter::new()
            .write(&[ArchiveEntry::new(name, vec![])])
            .unwrap_err();
        assert!(matches!(
            err,
            UnsupportedInputError::NameTooLong { len, .. } if len == MAX_NAME_LEN + 1
        ));
    }

    #[test]
    fn test_accepts_name_at_field_width() {
        let name = "n".repeat(MAX_NAME_LEN);
        assert!(StoredZipWriter::new()
            .write(&[ArchiveEntry::new(name, vec![])])
            .is_ok());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = StoredZipWriter::new()
            .write(&[
                ArchiveEntry::new("a.png", vec![1]),
                ArchiveEntry::new("a.png", vec![2]),
            ])
            .unwrap_err();
        assert_eq!(err, UnsupportedInputError::DuplicateName("a.png".into()));
    }

    #[test]
    fn test_rejects_too_many_entries() {
        let entries: Vec<_> = (0..=MAX_ENTRY_COUNT)
            .map(|i| ArchiveEntry::new(format!("{i}"), vec![]))
            .collect();
        let err = StoredZipWriter::new().write(&entries).unwrap_err();
        assert!(matches!(err, UnsupportedInputError::TooManyEntries { .. }));
    }
}
