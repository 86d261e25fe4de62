//! Fixed-width record layouts for the stored-only ZIP subset.
//!
//! All multi-byte fields are little-endian.

pub const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;

pub const LOCAL_HEADER_LEN: usize = 30;
pub const CENTRAL_DIRECTORY_RECORD_LEN: usize = 46;
pub const END_RECORD_LEN: usize = 22;

pub const METHOD_STORED: u16 = 0;
pub const VERSION_NEEDED: u16 = 10;
pub const VERSION_MADE_BY: u16 = 20;

/// General-purpose flag bit 3: sizes and CRC follow the data instead.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// General-purpose flag bit 11: name is UTF-8.
pub const FLAG_UTF8_NAME: u16 = 1 << 11;

/// 1980-01-01 00:00:00, the earliest MS-DOS timestamp.
pub const DOS_TIME: u16 = 0;
pub const DOS_DATE: u16 = (1 << 5) | 1;

pub const MAX_NAME_LEN: usize = u16::MAX as usize;
pub const MAX_ENTRY_COUNT: usize = u16::MAX as usize;
pub const MAX_FIELD_VALUE: u64 = u32::MAX as u64;

/// Fields of a local file header that the reader consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalHeader {
    pub flags: u16,
    pub method: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_len: u16,
    pub extra_len: u16,
}

impl LocalHeader {
    /// Parses the 30 bytes at the start of `bytes`. Returns `None` when
    /// fewer than 30 bytes are given or the signature does not match.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < LOCAL_HEADER_LEN || read_u32(bytes, 0)? != LOCAL_HEADER_SIGNATURE {
            return None;
        }
        Some(Self {
            flags: read_u16(bytes, 6)?,
            method: read_u16(bytes, 8)?,
            crc32: read_u32(bytes, 14)?,
            compressed_size: read_u32(bytes, 18)?,
            uncompressed_size: read_u32(bytes, 22)?,
            name_len: read_u16(bytes, 26)?,
            extra_len: read_u16(bytes, 28)?,
        })
    }

    /// Length of the data region. Stored entries carry equal sizes; a zero
    /// compressed size falls back to the uncompressed one.
    pub fn data_len(&self) -> u32 {
        if self.compressed_size != 0 {
            self.compressed_size
        } else {
            self.uncompressed_size
        }
    }
}

/// Per-entry values shared by the local header and the directory record.
#[derive(Clone, Copy, Debug)]
pub struct EntryFields {
    pub flags: u16,
    pub crc32: u32,
    pub size: u32,
    pub name_len: u16,
}

pub fn push_local_header(out: &mut Vec<u8>, fields: &EntryFields) {
    push_u32(out, LOCAL_HEADER_SIGNATURE);
    push_u16(out, VERSION_NEEDED);
    push_u16(out, fields.flags);
    push_u16(out, METHOD_STORED);
    push_u16(out, DOS_TIME);
    push_u16(out, DOS_DATE);
    push_u32(out, fields.crc32);
    push_u32(out, fields.size);
    push_u32(out, fields.size);
    push_u16(out, fields.name_len);
    push_u16(out, 0); // extra field length
}

pub fn push_central_directory_record(out: &mut Vec<u8>, fields: &EntryFields, local_offset: u32) {
    push_u32(out, CENTRAL_DIRECTORY_SIGNATURE);
    push_u16(out, VERSION_MADE_BY);
    push_u16(out, VERSION_NEEDED);
    push_u16(out, fields.flags);
    push_u16(out, METHOD_STORED);
    push_u16(out, DOS_TIME);
    push_u16(out, DOS_DATE);
    push_u32(out, fields.crc32);
    push_u32(out, fields.size);
    push_u32(out, fields.size);
    push_u16(out, fields.name_len);
    push_u16(out, 0); // extra field length
    push_u16(out, 0); // comment length
    push_u16(out, 0); // disk number start
    push_u16(out, 0); // internal attributes
    push_u32(out, 0); // external attributes
    push_u32(out, local_offset);
}

pub fn push_end_record(out: &mut Vec<u8>, entry_count: u16, directory_len: u32, directory_offset: u32) {
    push_u32(out, END_OF_CENTRAL_DIRECTORY_SIGNATURE);
    push_u16(out, 0); // this disk
    push_u16(out, 0); // disk holding the directory
    push_u16(out, entry_count);
    push_u16(out, entry_count);
    push_u32(out, directory_len);
    push_u32(out, directory_offset);
    push_u16(out, 0); // comment length
}

pub fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

pub fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
