pub mod archive_entry;
pub mod archive_error;
pub mod archive_reader;
pub mod archive_writer;
