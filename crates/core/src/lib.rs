//! Batch headshot framing and a stored-only ZIP codec.
//!
//! Face detection and pixel work sit behind the [`detection`] and
//! [`imaging`] traits; [`framing`] decides the crop and [`archive`] packs
//! the results.

pub mod archive;
pub mod detection;
pub mod framing;
pub mod imaging;
pub mod pipeline;
pub mod shared;
