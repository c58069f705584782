use std::io::Write;

use crate::frame::{self, FrameHeader, FrameKind};
use crate::marker::{is_marker_code, Marker};
use crate::render::FieldWriter;
use crate::{validate_soi, Cursor, Error, TruncatedRead};

/// Two byte values below and including this are never dispatched
const FILLER_END: u16 = 0xFF01;
/// Fill bytes
const FILL: u16 = 0xFFFF;
/// Stuffed zero byte in entropy-coded data
const STUFFED_ZERO: u16 = 0xFF00;

/// How the scanner moves from one position to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Check every position and decode frame headers where they are found
    ///
    /// Segment lengths are not used and entropy-coded data is scanned like
    /// everything else.
    #[default]
    Coarse,
    /// Jump over segments via their length field and skip entropy-coded
    /// data after SOS
    Segmented,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub truncation: TruncatedRead,
    pub policy: ScanPolicy,
}

/// Segment visited by [`ScanPolicy::Segmented`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    pub marker: Marker,
    /// Position of the marker
    pub position: usize,
    /// Length field, `None` for markers without one
    pub length: Option<u16>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Decoded frame headers in order of appearance
    pub frames: Vec<FrameHeader>,
    /// Only filled by [`ScanPolicy::Segmented`]
    pub segments: Vec<SegmentInfo>,
    /// Number of loop iterations
    pub steps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    BeforeSos,
    InScanData,
    Done,
}

/// Walks the marker structure of JPEG data
pub struct Scanner<'a, W> {
    cursor: Cursor<'a>,
    out: FieldWriter<W>,
    policy: ScanPolicy,
}

impl<'a, W: Write> Scanner<'a, W> {
    pub fn new(data: &'a [u8], out: W, options: ScanOptions) -> Self {
        Self {
            cursor: Cursor::with_truncation(data, options.truncation),
            out: FieldWriter::new(out),
            policy: options.policy,
        }
    }

    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Validates SOI and scans until the end of the data
    pub fn run(&mut self) -> Result<ScanReport, Error> {
        validate_soi(&mut self.cursor)?;

        let report = match self.policy {
            ScanPolicy::Coarse => self.scan_coarse()?,
            ScanPolicy::Segmented => self.scan_segmented()?,
        };

        tracing::debug!(
            "Scan finished after {} steps at {:#x} with {} frame header(s)",
            report.steps,
            self.cursor.position(),
            report.frames.len()
        );

        self.out.flush()?;

        Ok(report)
    }

    fn scan_coarse(&mut self) -> Result<ScanReport, Error> {
        let mut report = ScanReport::default();

        while self.cursor.has_next() {
            report.steps = report.steps.saturating_add(1);

            // Out of range counts as zero, which is filler
            match self.cursor.peek_marker().unwrap_or(0) {
                value if value <= FILLER_END || value == FILL => self.cursor.advance(),
                value if is_frame_marker(value) => {
                    let frame = frame::decode(&mut self.cursor, &mut self.out)?;
                    report.frames.push(frame);
                }
                value => {
                    tracing::trace!(
                        "Skipping marker {:?} at {:#x}",
                        Marker::from(value),
                        self.cursor.position()
                    );
                    self.cursor.advance();
                }
            }
        }

        Ok(report)
    }

    fn scan_segmented(&mut self) -> Result<ScanReport, Error> {
        let mut report = ScanReport::default();
        let mut state = WalkState::BeforeSos;

        while state != WalkState::Done && self.cursor.has_next() && self.cursor.has_lookahead() {
            report.steps = report.steps.saturating_add(1);

            state = match state {
                WalkState::BeforeSos => self.step_before_sos(&mut report)?,
                WalkState::InScanData => self.step_in_scan_data(),
                WalkState::Done => WalkState::Done,
            };
        }

        Ok(report)
    }

    fn step_before_sos(&mut self, report: &mut ScanReport) -> Result<WalkState, Error> {
        let value = self.cursor.peek_complete_marker();
        let Some(value) = value.filter(|x| is_marker_code(*x)) else {
            self.cursor.advance();
            return Ok(WalkState::BeforeSos);
        };

        let marker = Marker::from(value);
        let position = self.cursor.position();

        if is_frame_marker(value) {
            let frame = frame::decode(&mut self.cursor, &mut self.out)?;

            // Data covered by Lf beyond the component records
            let end = position.saturating_add(2).saturating_add(frame.lf.into());
            if end > self.cursor.position() {
                tracing::debug!("Skipping frame header data up to {end:#x}");
                self.cursor.skip(end.saturating_sub(self.cursor.position()));
            }

            let segment = SegmentInfo {
                marker,
                position,
                length: Some(frame.lf),
            };
            report.segments.push(segment);
            report.frames.push(frame);
            return Ok(WalkState::BeforeSos);
        }

        if !marker.has_length() {
            let segment = SegmentInfo {
                marker,
                position,
                length: None,
            };
            self.out.segment(&segment)?;
            report.segments.push(segment);
            self.cursor.skip(2);

            if marker == Marker::EOI {
                return Ok(WalkState::Done);
            }
            return Ok(WalkState::BeforeSos);
        }

        self.cursor.skip(2);
        let length = self.cursor.read_be_u16()?;
        // The length includes the length field itself
        self.cursor.skip(usize::from(length).saturating_sub(2));

        tracing::debug!("Segment {marker:?} at {position:#x} with length {length}");

        let segment = SegmentInfo {
            marker,
            position,
            length: Some(length),
        };
        self.out.segment(&segment)?;
        report.segments.push(segment);

        if marker == Marker::SOS {
            Ok(WalkState::InScanData)
        } else {
            Ok(WalkState::BeforeSos)
        }
    }

    fn step_in_scan_data(&mut self) -> WalkState {
        match self.cursor.peek_complete_marker() {
            Some(STUFFED_ZERO) => {
                self.cursor.skip(2);
                WalkState::InScanData
            }
            Some(value) if Marker::from(value).is_rst() => {
                self.cursor.skip(2);
                WalkState::InScanData
            }
            Some(value) if is_marker_code(value) => {
                tracing::debug!("Entropy-coded data ends at {:#x}", self.cursor.position());
                WalkState::BeforeSos
            }
            _ => {
                self.cursor.advance();
                WalkState::InScanData
            }
        }
    }
}

/// Markers handed to the frame header decoder
fn is_frame_marker(value: u16) -> bool {
    FrameKind::try_from(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(data: &[u8], options: ScanOptions) -> (ScanReport, usize, String) {
        let mut scanner = Scanner::new(data, Vec::new(), options);
        let report = scanner.run().unwrap();
        let position = scanner.cursor().position();
        let text = String::from_utf8(scanner.into_inner()).unwrap();
        (report, position, text)
    }

    #[test]
    fn filler_advances_one_byte() {
        // Only SOF0 and SOF3 are dispatched
        for value in [
            0x0000_u16, 0x1234, 0xFEFF, 0xFF00, 0xFF01, 0xFFFF, 0xFFD9, 0xFFC2,
        ] {
            let mut data = vec![0xFF, 0xD8];
            data.extend_from_slice(&value.to_be_bytes());
            data.push(0);

            let (report, position, text) = scan(&data, ScanOptions::default());
            assert!(report.frames.is_empty());
            assert!(text.is_empty());
            // One step per position up to and including the end of the data
            assert_eq!(report.steps, data.len() - 1);
            assert_eq!(position, data.len() + 1);
        }
    }

    #[test]
    fn coarse_finds_frame_after_other_segments() {
        let data = [
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0xAB, 0xCD, // APP0
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x02, 0x00, 0x03, 0x01, 0x01, 0x11, 0x00, //
            0xFF, 0xD9,
        ];
        let (report, _, text) = scan(&data, ScanOptions::default());

        assert_eq!(report.frames.len(), 1);
        assert_eq!(report.frames[0].position, 8);
        assert_eq!(report.frames[0].y, 2);
        assert_eq!(report.frames[0].x, 3);
        assert!(report.segments.is_empty());
        assert_eq!(text.lines().next(), Some(frame::FRAME_HEADER_BANNER));
    }

    #[test]
    fn coarse_ignores_truncation_policy_while_scanning() {
        let data = [0xFF, 0xD8, 0x00, 0x01];
        let options = ScanOptions {
            truncation: TruncatedRead::Fail,
            ..Default::default()
        };
        let (report, _, _) = scan(&data, options);
        assert!(report.frames.is_empty());
    }

    #[test]
    fn segmented_skips_payload_and_scan_data() {
        let data = [
            0xFF, 0xD8, // SOI
            0xFF, 0xDB, 0x00, 0x05, 0xFF, 0xC0, 0x00, // DQT with a fake SOF0 in its payload
            0xFF, 0xC3, 0x00, 0x0B, 0x08, 0x00, 0x02, 0x00, 0x03, 0x01, 0x01, 0x11, 0x00, //
            0xFF, 0xDA, 0x00, 0x03, 0x00, // SOS
            0x12, 0xFF, 0x00, 0xFF, 0xD0, // scan data
            0xFF, 0xC0, 0x00, 0x08, 0x08, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
        ];
        let options = ScanOptions {
            policy: ScanPolicy::Segmented,
            ..Default::default()
        };
        let (report, _, text) = scan(&data, options);

        let markers: Vec<_> = report.segments.iter().map(|x| x.marker).collect();
        assert_eq!(
            markers,
            [Marker::DQT, Marker::SOF3, Marker::SOS, Marker::SOF0]
        );
        assert_eq!(report.segments[0].length, Some(5));
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.frames[0].marker, Marker::SOF3);
        assert_eq!(report.frames[1].position, 32);
        assert!(text.contains("   DQT 0xFFDB at 0x00000002, length 5"));
    }

    #[test]
    fn segmented_skips_frame_header_by_length() {
        let data = [
            0xFF, 0xD8, // SOI
            0xFF, 0xC0, 0x00, 0x0E, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, //
            0xFF, 0xC0, 0x00, // covered by Lf
            0xFF, 0xD9,
        ];
        let options = ScanOptions {
            policy: ScanPolicy::Segmented,
            ..Default::default()
        };
        let (report, position, _) = scan(&data, options);

        let segments: Vec<_> = report
            .segments
            .iter()
            .map(|x| (x.marker, x.position))
            .collect();
        assert_eq!(segments, [(Marker::SOF0, 2), (Marker::EOI, 18)]);
        assert_eq!(report.frames.len(), 1);
        assert_eq!(position, data.len());

        // The coarse policy decodes the bytes covered by Lf
        let (report, _, _) = scan(&data, ScanOptions::default());
        assert_eq!(report.frames.len(), 2);
    }

    #[test]
    fn segmented_stops_at_eoi() {
        let data = [0xFF, 0xD8, 0xFF, 0xD9, 0xFF, 0xC0, 0x00, 0x00, 0x00];
        let options = ScanOptions {
            policy: ScanPolicy::Segmented,
            ..Default::default()
        };
        let (report, position, _) = scan(&data, options);

        assert_eq!(report.segments.len(), 1);
        assert_eq!(report.segments[0].marker, Marker::EOI);
        assert!(report.frames.is_empty());
        assert_eq!(position, 4);
    }
}
