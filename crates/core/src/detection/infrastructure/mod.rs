pub mod confidence_filter_detector;
pub mod null_face_detector;
pub mod precomputed_face_detector;
