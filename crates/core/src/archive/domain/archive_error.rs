use thiserror::Error;

/// Writer input that cannot be represented in the fixed-width header fields.
///
/// Reported before any output byte is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedInputError {
    #[error("archive entry name must not be empty")]
    EmptyName,
    #[error("entry name is {len} bytes, limit is {limit}: {name}")]
    NameTooLong {
        name: String,
        len: usize,
        limit: usize,
    },
    #[error("entry {name} holds {len} bytes, limit is {limit}")]
    DataTooLarge { name: String, len: usize, limit: u64 },
    #[error("{count} entries exceed the limit of {limit}")]
    TooManyEntries { count: usize, limit: usize },
    #[error("archive would be {len} bytes, offsets are limited to {limit}")]
    ArchiveTooLarge { len: u64, limit: u64 },
    #[error("duplicate entry name: {0}")]
    DuplicateName(String),
}

/// The archive bytes are corrupt or truncated; no partial result is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated local header at offset {offset}: {remaining} bytes remain, need {needed}")]
    TruncatedHeader {
        offset: usize,
        remaining: usize,
        needed: usize,
    },
    #[error("entry at offset {offset} declares {needed} bytes past its header, only {available} remain")]
    DataOutOfBounds {
        offset: usize,
        needed: u64,
        available: usize,
    },
    #[error("entry name at offset {offset} is not valid UTF-8")]
    InvalidName { offset: usize },
    #[error("checksum mismatch for {name}: header says {expected:#010x}, data is {actual:#010x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },
}
