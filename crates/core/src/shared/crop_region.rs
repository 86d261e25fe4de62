use serde::{Deserialize, Serialize};

/// Square crop rectangle in source-image pixels.
///
/// Producers guarantee `left + size <= image_width` and
/// `top + size <= image_height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub size: u32,
}

impl CropRegion {
    pub fn new(left: u32, top: u32, size: u32) -> Self {
        Self { left, top, size }
    }

    pub fn right(&self) -> u32 {
        self.left + self.size
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.size
    }

    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.right() <= image_width && self.bottom() <= image_height
    }
}
