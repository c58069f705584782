//! Walk the marker structure of JPEG data and dump frame headers
//!
//! ```
//! use sofscan_jpeg::{ScanOptions, Scanner};
//!
//! let data = [
//!     0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x01, 0x00, 0x01, 0x40, 0x01, 0x01, 0x22,
//!     0x00,
//! ];
//!
//! let mut scanner = Scanner::new(&data, Vec::new(), ScanOptions::default());
//! let report = scanner.run().unwrap();
//!
//! assert_eq!(report.frames[0].x, 320);
//! ```

mod cursor;
mod error;
pub mod frame;
mod marker;
mod render;
mod scanner;

pub use cursor::*;
pub use error::*;
pub use frame::{Component, FrameHeader, FrameKind};
pub use marker::*;
pub use render::*;
pub use scanner::*;

/// Start of image marker as it appears in the data
pub const SOI_BYTES: [u8; 2] = [0xFF, 0xD8];

/// Checks if passed data start with the SOI marker
pub fn is_filetype(data: &[u8]) -> bool {
    data.starts_with(&SOI_BYTES)
}

/// Checks for and consumes the SOI marker
///
/// Any data starting with `FF D8` is accepted, even if nothing follows.
pub fn validate_soi(cursor: &mut Cursor) -> Result<(), Error> {
    let data = cursor.get_ref();

    if !is_filetype(data) {
        let found = data.iter().take(SOI_BYTES.len()).copied().collect();
        return Err(Error::InvalidSoi(found));
    }

    cursor.skip(SOI_BYTES.len());

    Ok(())
}
