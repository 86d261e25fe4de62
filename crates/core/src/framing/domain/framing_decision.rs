use crate::shared::crop_region::CropRegion;
use crate::shared::face_rect::FaceRect;

use super::{crop_geometry, face_selector};

/// The chosen subject (if any) and the square to cut around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramingDecision {
    pub face: Option<FaceRect>,
    pub crop: CropRegion,
}

impl FramingDecision {
    /// Select → crop for one image. Pure; safe to run per image in parallel.
    ///
    /// Boxes with no height cannot be framed and never compete in selection.
    pub fn decide(faces: &[FaceRect], image_width: u32, image_height: u32) -> Self {
        let usable: Vec<FaceRect> = faces
            .iter()
            .filter(|f| !f.is_degenerate())
            .copied()
            .collect();
        let face = face_selector::select(&usable, image_height);
        let crop = crop_geometry::crop(image_width, image_height, face.as_ref());
        Self { face, crop }
    }

    pub fn used_fallback(&self) -> bool {
        self.face.is_none()
    }
}
