pub mod marker;

pub use marker::{extract, extract_from_file, ExtractedImage, EOI, SOI};
