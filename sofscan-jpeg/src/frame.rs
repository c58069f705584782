use std::io::Write;

use crate::render::{FieldType, FieldWriter};
use crate::{Cursor, Error, Marker};

pub const FRAME_HEADER_BANNER: &str = "Frame Header, B.2.2, p.35";

/// Bits `Hi` is shifted by in the combined sampling factor byte
const HI_SHIFT: u32 = 4;
/// Mask of `Vi` in the combined sampling factor byte
const VI_MASK: u8 = 0b1111;
/// Mask of the meaningful bits of `Tqi`
const TQ_MASK: u8 = 0b1111;

sofscan_common::utils::maybe_convertible_enum!(
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FrameKind {
        Lossy = 0xFFC0,
        Lossless = 0xFFC3,
    }
);

impl FrameKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Lossy => "Lossy",
            Self::Lossless => "Lossless",
        }
    }
}

/// Frame Header / Start of Frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Marker the frame started with
    pub marker: Marker,
    /// Position of the marker in the data
    pub position: usize,
    /// Frame header length
    pub lf: u16,
    /// Sample precision
    pub p: u8,
    /// Number of lines
    pub y: u16,
    /// Number of samples per line
    pub x: u16,
    /// Number of image components in frame
    pub nf: u8,
    /// Component specification parameters
    pub components: Vec<Component>,
}

impl FrameHeader {
    /// `None` for markers that are not implemented
    pub fn kind(&self) -> Option<FrameKind> {
        FrameKind::try_from(Into::<u16>::into(self.marker)).ok()
    }
}

/// Frame component specification parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Component identifier
    pub ci: u8,
    /// Horizontal sampling factor
    pub hi: u8,
    /// Vertical sampling factor
    pub vi: u8,
    /// Quantization table destination selector, as stored
    pub tqi: u8,
}

impl Component {
    /// Splits the combined sampling factor byte into `(Hi, Vi)`
    pub fn split_sampling_factors(hv: u8) -> (u8, u8) {
        (hv >> HI_SHIFT, hv & VI_MASK)
    }

    /// Quantization table destination, only the low nibble is significant
    pub fn tq_destination(&self) -> u8 {
        self.tqi & TQ_MASK
    }
}

/// Decodes and renders a frame header
///
/// The cursor has to be positioned at the SOF marker. Afterwards it is
/// positioned exactly `10 + 3 * Nf` bytes further, independent of `Lf`.
/// Fields are written to `out` in the order they are read. No value is
/// checked against the constraints of B.2.2.
pub fn decode<W: Write>(
    cursor: &mut Cursor,
    out: &mut FieldWriter<W>,
) -> Result<FrameHeader, Error> {
    let position = cursor.position();

    out.banner(FRAME_HEADER_BANNER)?;

    let marker_value = cursor.read_be_u16()?;
    let marker = Marker::from(marker_value);
    let label = match FrameKind::try_from(marker_value) {
        Ok(kind) => {
            tracing::debug!("Decoding {} frame header at {position:#x}", kind.label());
            format!("Start of frame ({})", kind.label())
        }
        Err(err) => {
            tracing::warn!("Frame header at {position:#x}: {err}");
            String::from("Start of frame (unimplemented)")
        }
    };
    out.field(&label, "SOFn", FieldType::U16, marker_value)?;

    let lf = cursor.read_be_u16()?;
    out.field("Frame header length", "Lf", FieldType::U16, lf)?;

    let p = cursor.read_u8()?;
    out.field("Sample precision", "P", FieldType::U8, p.into())?;

    let y = cursor.read_be_u16()?;
    out.field("Number of lines", "Y", FieldType::U16, y)?;

    let x = cursor.read_be_u16()?;
    out.field("Samples per line", "X", FieldType::U16, x)?;

    let nf = cursor.read_u8()?;
    out.field("Number of components", "Nf", FieldType::U8, nf.into())?;

    let mut components = Vec::with_capacity(nf.into());
    for i in 0..nf {
        out.banner(&format!("Component {i}"))?;
        components.push(decode_component(cursor, out)?);
    }

    Ok(FrameHeader {
        marker,
        position,
        lf,
        p,
        y,
        x,
        nf,
        components,
    })
}

fn decode_component<W: Write>(
    cursor: &mut Cursor,
    out: &mut FieldWriter<W>,
) -> Result<Component, Error> {
    let ci = cursor.read_u8()?;
    out.field("Component identifier", "Ci", FieldType::U8, ci.into())?;

    let (hi, vi) = Component::split_sampling_factors(cursor.read_u8()?);
    out.field("Horizontal sampling factor", "Hi", FieldType::U4, hi.into())?;
    out.field("Vertical sampling factor", "Vi", FieldType::U4, vi.into())?;

    let tqi = cursor.read_u8()?;
    out.field(
        "Quantization table selector",
        "Tqi",
        FieldType::U8,
        tqi.into(),
    )?;

    Ok(Component { ci, hi, vi, tqi })
}
