use crate::shared::crop_region::CropRegion;
use crate::shared::frame::Frame;

pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Pixel I/O around the framing decision: decode an upload, then cut,
/// resample and encode the chosen square.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, CodecError>;

    /// Encoded output image of `target_size × target_size` pixels.
    fn render(&self, frame: &Frame, crop: CropRegion, target_size: u32)
        -> Result<Vec<u8>, CodecError>;
}
