use crate::shared::face_rect::FaceRect;

/// Weight for faces centered in the upper half of the frame.
pub const UPPER_WEIGHT: f64 = 3.0;
/// Weight for faces centered between the upper half and `MIDDLE_LIMIT`.
pub const MIDDLE_WEIGHT: f64 = 1.0;
/// Weight for faces centered low in the frame (usually bystanders).
pub const LOWER_WEIGHT: f64 = 0.05;

pub const UPPER_LIMIT: f64 = 0.5;
pub const MIDDLE_LIMIT: f64 = 0.65;

/// Position weight for a face whose vertical center is `center_y`.
pub fn position_weight(center_y: f64, image_height: u32) -> f64 {
    let h = image_height as f64;
    if center_y < h * UPPER_LIMIT {
        UPPER_WEIGHT
    } else if center_y < h * MIDDLE_LIMIT {
        MIDDLE_WEIGHT
    } else {
        LOWER_WEIGHT
    }
}

pub fn score(face: &FaceRect, image_height: u32) -> f64 {
    face.confidence * position_weight(face.center_y(), image_height)
}

/// Picks the subject of a headshot among detected faces.
///
/// Highest `confidence × position weight` wins; on equal scores the
/// earliest face is kept. Returns `None` only for an empty slice.
pub fn select(faces: &[FaceRect], image_height: u32) -> Option<FaceRect> {
    let mut best = *faces.first()?;
    let mut best_score = -1.0;

    for face in faces {
        let s = score(face, image_height);
        if s > best_score {
            best_score = s;
            best = *face;
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    /// Face of height 100 whose vertical center sits at `cy`.
    fn face_at(cy: i32, confidence: f64) -> FaceRect {
        FaceRect::new(10, cy - 50, 80, 100, confidence)
    }

    #[test]
    fn test_empty_returns_none() {
        assert!(select(&[], 1000).is_none());
    }

    #[test]
    fn test_single_face_is_selected_even_when_low() {
        let face = face_at(950, 0.01);
        assert_eq!(select(&[face], 1000), Some(face));
    }

    #[rstest]
    #[case::top(100, UPPER_WEIGHT)]
    #[case::just_above_half(499, UPPER_WEIGHT)]
    #[case::half(500, MIDDLE_WEIGHT)]
    #[case::just_above_limit(649, MIDDLE_WEIGHT)]
    #[case::middle_limit(650, LOWER_WEIGHT)]
    #[case::bottom(990, LOWER_WEIGHT)]
    fn test_position_weight_bands(#[case] cy: i32, #[case] expected: f64) {
        assert_relative_eq!(position_weight(cy as f64, 1000), expected);
    }

    #[test]
    fn test_position_bias_beats_raw_confidence() {
        // 0.71 × 3.0 = 2.13 against 0.95 × 0.05 = 0.0475
        let upper = face_at(300, 0.71);
        let lower = face_at(900, 0.95);
        assert_eq!(select(&[lower, upper], 1000), Some(upper));
        assert_relative_eq!(score(&upper, 1000), 2.13, epsilon = 1e-9);
        assert_relative_eq!(score(&lower, 1000), 0.0475, epsilon = 1e-9);
    }

    #[test]
    fn test_tie_keeps_first_in_input_order() {
        let first = FaceRect::new(10, 100, 50, 100, 0.9);
        let second = FaceRect::new(500, 100, 50, 100, 0.9);
        assert_eq!(select(&[first, second], 1000), Some(first));
        assert_eq!(select(&[second, first], 1000), Some(second));
    }

    #[test]
    fn test_higher_score_later_replaces_earlier() {
        let a = face_at(200, 0.75);
        let b = face_at(250, 0.9);
        assert_eq!(select(&[a, b], 1000), Some(b));
    }

    #[test]
    fn test_middle_band_beats_low_band() {
        let middle = face_at(600, 0.5);
        let low = face_at(800, 1.0);
        assert_eq!(select(&[low, middle], 1000), Some(middle));
    }

    #[test]
    fn test_half_pixel_center_uses_fractional_height() {
        // y = 449, height 101 → cy = 499.5 < 500
        let face = FaceRect::new(0, 449, 10, 101, 1.0);
        assert_relative_eq!(score(&face, 1000), UPPER_WEIGHT);
    }
}
