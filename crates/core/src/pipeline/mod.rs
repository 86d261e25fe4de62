pub mod batch_executor;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod process_batch_use_case;
pub mod processing_config;
pub mod unpack_archive_use_case;
