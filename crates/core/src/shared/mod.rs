pub mod constants;
pub mod crop_region;
pub mod face_rect;
pub mod frame;
pub mod upload;
