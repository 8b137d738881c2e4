use crate::error::{PrdrSnapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// JPEG Start-Of-Image marker.
pub const SOI: [u8; 2] = [0xFF, 0xD8];
/// JPEG End-Of-Image marker.
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// A JPEG stream carved out of a profile file.
///
/// Owns its bytes; the raw profile buffer it was carved from is scoped to
/// the extraction call and released when it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub source_path: PathBuf,
    pub bytes: Vec<u8>,
    pub soi_offset: usize,
    pub eoi_offset: usize,
}

impl ExtractedImage {
    pub fn filename(&self) -> String {
        self.source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Find the first occurrence of a two-byte marker, scanning left to right.
fn find_marker(buffer: &[u8], marker: [u8; 2]) -> Option<usize> {
    if buffer.len() < 2 {
        return None;
    }
    (0..buffer.len() - 1).find(|&i| buffer[i] == marker[0] && buffer[i + 1] == marker[1])
}

/// Extract the first embedded JPEG from a raw profile buffer.
///
/// Both markers are searched from the start of the buffer. The EOI scan is
/// intentionally not anchored at the SOI offset; a buffer whose first EOI
/// precedes its first SOI is rejected as `MalformedImage` instead of
/// producing a degenerate range.
///
/// On success returns the owned byte span `[soi, eoi + 2)` together with
/// both marker offsets. Pure function of the input; the JPEG payload itself
/// is not decoded or validated here.
pub fn extract(buffer: &[u8]) -> Result<(Vec<u8>, usize, usize)> {
    let soi_offset = find_marker(buffer, SOI).ok_or(PrdrSnapError::MarkerNotFound)?;
    let eoi_offset = find_marker(buffer, EOI).ok_or(PrdrSnapError::MarkerNotFound)?;

    if eoi_offset <= soi_offset {
        return Err(PrdrSnapError::MalformedImage {
            soi: soi_offset,
            eoi: eoi_offset,
        });
    }

    let bytes = buffer[soi_offset..eoi_offset + 2].to_vec();
    Ok((bytes, soi_offset, eoi_offset))
}

/// Read a profile file whole and extract its embedded JPEG.
///
/// The file buffer lives only for the duration of this call.
pub fn extract_from_file<P: AsRef<Path>>(path: P) -> Result<ExtractedImage> {
    let path = path.as_ref();
    let buffer = fs::read(path).map_err(|e| PrdrSnapError::from_io(path, e))?;

    let (bytes, soi_offset, eoi_offset) = extract(&buffer)?;

    Ok(ExtractedImage {
        source_path: path.to_path_buf(),
        bytes,
        soi_offset,
        eoi_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_simple_span() {
        // SOI at 1, EOI at 5; payload between them.
        let buffer = [0x00, 0xFF, 0xD8, 0x01, 0x02, 0xFF, 0xD9, 0x99];
        let (bytes, soi, eoi) = extract(&buffer).unwrap();

        assert_eq!(bytes, vec![0xFF, 0xD8, 0x01, 0x02, 0xFF, 0xD9]);
        assert_eq!(soi, 1);
        assert_eq!(eoi, 5);
        assert_eq!(bytes.len(), eoi - soi + 2);
    }

    #[test]
    fn test_extract_takes_first_markers() {
        // Two SOI/EOI pairs; only the first of each is honored.
        let buffer = [
            0xFF, 0xD8, 0xAA, 0xFF, 0xD9, 0x00, 0xFF, 0xD8, 0xBB, 0xFF, 0xD9,
        ];
        let (bytes, soi, eoi) = extract(&buffer).unwrap();
        assert_eq!(soi, 0);
        assert_eq!(eoi, 3);
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xAA, 0xFF, 0xD9]);
    }

    #[test]
    fn test_missing_markers() {
        assert!(matches!(
            extract(&[0x00, 0x01, 0x02]),
            Err(PrdrSnapError::MarkerNotFound)
        ));
        // SOI present, EOI absent
        assert!(matches!(
            extract(&[0xFF, 0xD8, 0x00, 0x01]),
            Err(PrdrSnapError::MarkerNotFound)
        ));
        // EOI present, SOI absent
        assert!(matches!(
            extract(&[0x00, 0xFF, 0xD9]),
            Err(PrdrSnapError::MarkerNotFound)
        ));
        // Degenerate buffers
        assert!(matches!(extract(&[]), Err(PrdrSnapError::MarkerNotFound)));
        assert!(matches!(
            extract(&[0xFF]),
            Err(PrdrSnapError::MarkerNotFound)
        ));
    }

    #[test]
    fn test_eoi_before_soi_is_malformed() {
        let buffer = [0xFF, 0xD9, 0xFF, 0xD8];
        match extract(&buffer) {
            Err(PrdrSnapError::MalformedImage { soi, eoi }) => {
                assert_eq!(soi, 2);
                assert_eq!(eoi, 0);
            }
            other => panic!("expected MalformedImage, got {:?}", other),
        }
    }

    #[test]
    fn test_adjacent_markers_extract() {
        // FF D8 FF D9: EOI found at 2, after SOI at 0, a valid four-byte image.
        let buffer = [0xFF, 0xD8, 0xFF, 0xD9];
        let (bytes, soi, eoi) = extract(&buffer).unwrap();
        assert_eq!((soi, eoi), (0, 2));
        assert_eq!(bytes, buffer.to_vec());
    }

    #[test]
    fn test_leading_eoi_with_padding_is_malformed() {
        // FF D9 before any FF D8 trips the guard even with bytes between.
        let buffer = [0xFF, 0xD9, 0x00, 0xFF, 0xD8, 0x00];
        assert!(matches!(
            extract(&buffer),
            Err(PrdrSnapError::MalformedImage { .. })
        ));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let buffer = [0x10, 0xFF, 0xD8, 0x42, 0xFF, 0xD9, 0x20];
        let first = extract(&buffer).unwrap();
        let second = extract(&buffer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("PRDR3001");
        fs::write(&path, [0x00, 0x00, 0xFF, 0xD8, 0x7F, 0xFF, 0xD9, 0x00]).unwrap();

        let image = extract_from_file(&path).unwrap();
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0x7F, 0xFF, 0xD9]);
        assert_eq!(image.soi_offset, 2);
        assert_eq!(image.eoi_offset, 5);
        assert_eq!(image.filename(), "PRDR3001");
        assert_eq!(image.len(), 5);
        assert!(!image.is_empty());
    }

    #[test]
    fn test_extract_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = extract_from_file(temp_dir.path().join("PRDR_missing"));
        assert!(matches!(result, Err(PrdrSnapError::Io(_))));
    }
}
