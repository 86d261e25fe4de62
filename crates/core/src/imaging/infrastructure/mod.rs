pub mod image_crate_codec;
