use std::io::Write;

use crate::SegmentInfo;

/// Declared bit width of a rendered field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U4,
    U8,
    U16,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            Self::U4 => "u4",
            Self::U8 => "u8",
            Self::U16 => "u16",
        }
    }

    /// Number of hex digits needed for the full range
    pub fn hex_digits(self) -> usize {
        match self {
            Self::U4 => 1,
            Self::U8 => 2,
            Self::U16 => 4,
        }
    }
}

/// Line oriented text output
///
/// One line per field:
///
/// ```text
///             Sample precision, P   , u8 , 0x08, 8
/// ```
#[derive(Debug)]
pub struct FieldWriter<W> {
    inner: W,
}

impl<W: Write> FieldWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn banner(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.inner, "{title}")
    }

    pub fn field(
        &mut self,
        label: &str,
        name: &str,
        field_type: FieldType,
        value: u16,
    ) -> std::io::Result<()> {
        writeln!(
            self.inner,
            "{label:>28}, {name:<4}, {:<3}, 0x{value:0digits$X}, {value:<5}",
            field_type.name(),
            digits = field_type.hex_digits(),
        )
    }

    pub fn segment(&mut self, segment: &SegmentInfo) -> std::io::Result<()> {
        let name = segment.marker.name().unwrap_or("RES");
        let code: u16 = segment.marker.into();

        match segment.length {
            Some(length) => writeln!(
                self.inner,
                "{name:>6} 0x{code:04X} at {:#010x}, length {length:<5} {}",
                segment.position,
                segment.marker.description(),
            ),
            None => writeln!(
                self.inner,
                "{name:>6} 0x{code:04X} at {:#010x}, {:<13}{}",
                segment.position,
                "",
                segment.marker.description(),
            ),
        }
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
