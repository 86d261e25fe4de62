use crate::shared::constants::{PADDING_REFERENCE_SIZE, TOP_PADDING_PX};
use crate::shared::crop_region::CropRegion;
use crate::shared::face_rect::FaceRect;

/// Hair and crown extend this fraction of the face box height above its top,
/// since detector boxes start near the eyebrows.
pub const CROWN_EXTENSION: f64 = 0.35;

/// Crop edge as a multiple of face height, covering head to upper shoulders.
pub const CROP_SCALE: f64 = 2.2;

/// Lower bound on the crop edge as a multiple of face height.
pub const MIN_CROP_SCALE: f64 = 1.6;

/// Square crop for an image, face-centered when a usable face is given.
///
/// Faces without a positive height take the fallback path.
pub fn crop(image_width: u32, image_height: u32, face: Option<&FaceRect>) -> CropRegion {
    match face {
        Some(face) if !face.is_degenerate() => headshot_crop(image_width, image_height, face),
        _ => fallback_crop(image_width, image_height),
    }
}

/// Head-and-shoulders square around `face`.
///
/// Clamp order matters at image edges: size is clamped down, up, then down
/// again; edges are clamped low, then high, and rounded last.
pub fn headshot_crop(image_width: u32, image_height: u32, face: &FaceRect) -> CropRegion {
    let img_w = image_width as f64;
    let img_h = image_height as f64;
    let max_size = img_w.min(img_h);
    let face_h = face.height as f64;

    let face_cx = face.center_x();
    let head_top = face.y as f64 - (CROWN_EXTENSION * face_h).round();

    let mut size = (face_h * CROP_SCALE).round();
    size = size.min(max_size);
    size = size.max((face_h * MIN_CROP_SCALE).round());
    // The lower bound can exceed the image for very large faces.
    size = size.min(max_size).max(0.0);

    let padding = (TOP_PADDING_PX / PADDING_REFERENCE_SIZE * size).round();

    let mut top = head_top - padding;
    let mut left = face_cx - size / 2.0;

    if left < 0.0 {
        left = 0.0;
    }
    if top < 0.0 {
        top = 0.0;
    }
    if left + size > img_w {
        left = img_w - size;
    }
    if top + size > img_h {
        top = img_h - size;
    }
    let left = left.round().max(0.0);
    let top = top.round().max(0.0);

    CropRegion::new(left as u32, top as u32, size as u32)
}

/// Largest centered square, anchored to the top edge where heads usually are.
pub fn fallback_crop(image_width: u32, image_height: u32) -> CropRegion {
    let size = image_width.min(image_height);
    let left = ((image_width - size) as f64 / 2.0).round() as u32;
    CropRegion::new(left, 0, size)
}
