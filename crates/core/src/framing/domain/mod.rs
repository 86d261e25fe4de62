pub mod crop_geometry;
pub mod face_selector;
pub mod framing_decision;
