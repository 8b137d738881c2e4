pub mod profile_scanner;

pub use profile_scanner::{ProfileFile, ProfileScanner, DEFAULT_PROFILE_SUFFIX, PROFILE_PREFIX};
