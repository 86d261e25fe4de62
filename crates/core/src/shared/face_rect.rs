use serde::{Deserialize, Serialize};

/// A detected face in source-image pixel coordinates.
///
/// Coordinates may fall slightly outside the image when the detector's box
/// overhangs a frame edge; consumers clamp as needed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
}

impl FaceRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    /// Maps a normalized `[x1, y1, x2, y2]` box into pixel space.
    ///
    /// Each corner is scaled and rounded independently of the size, so
    /// `width` is `round((x2 - x1) * image_width)` rather than a difference
    /// of rounded corners.
    pub fn from_normalized_corners(
        corners: [f64; 4],
        confidence: f64,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let w = image_width as f64;
        let h = image_height as f64;
        let x1 = corners[0] * w;
        let y1 = corners[1] * h;
        let x2 = corners[2] * w;
        let y2 = corners[3] * h;
        Self {
            x: x1.round() as i32,
            y: y1.round() as i32,
            width: (x2 - x1).round() as i32,
            height: (y2 - y1).round() as i32,
            confidence,
        }
    }

    /// Vertical center in pixels.
    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.height as f64 / 2.0
    }

    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }

    /// True when the box has no positive height. Crop size derives from
    /// height alone, so a zero-width box still frames a head.
    pub fn is_degenerate(&self) -> bool {
        self.height <= 0
    }
}
