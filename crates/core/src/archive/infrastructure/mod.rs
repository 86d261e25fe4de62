pub mod crc32;
pub mod stored_zip_reader;
pub mod stored_zip_writer;
pub mod zip_layout;
