/// Upload extensions accepted into the pipeline (compared lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Output edge lengths a caller may request.
pub const VALID_TARGET_SIZES: &[u32] = &[500, 1000];
pub const DEFAULT_TARGET_SIZE: u32 = 500;

/// Gap between the crown of the head and the top edge, in output pixels
/// at `PADDING_REFERENCE_SIZE`.
pub const TOP_PADDING_PX: f64 = 20.0;
pub const PADDING_REFERENCE_SIZE: f64 = 1000.0;

/// Detections below this confidence are discarded before selection.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

pub const OUTPUT_EXTENSION: &str = "png";
pub const DEFAULT_ARCHIVE_NAME: &str = "headshots.zip";
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";
