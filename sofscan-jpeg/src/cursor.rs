use crate::Error;

/// Positions up to this value always count as having lookahead
const LOOKAHEAD: usize = 10;

/// What an out-of-range peek returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TruncatedRead {
    /// Silently return `0`
    #[default]
    ReturnZero,
    /// Return [`Error::TruncatedRead`]
    Fail,
}

/// Width of an integer read from the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }
}

/// Position-tracking view on borrowed data
///
/// All integers are big-endian. Multi-byte peeks are only in range if at least
/// one byte remains *after* the value, so a value ending exactly at the end of
/// the data is treated as truncated.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
    truncation: TruncatedRead,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_truncation(data, TruncatedRead::default())
    }

    pub fn with_truncation(data: &'a [u8], truncation: TruncatedRead) -> Self {
        Self {
            data,
            position: 0,
            truncation,
        }
    }

    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Value at the current position without advancing
    pub fn peek(&self, width: Width) -> Result<u16, Error> {
        let value = match width {
            Width::U8 => self.peek_array::<1>().map(|[b]| u16::from(b)),
            Width::U16 => self.peek_array::<2>().map(u16::from_be_bytes),
        };

        match value {
            Some(value) => Ok(value),
            None => self.truncated(width),
        }
    }

    /// Same as [`Self::peek`] but advances by `width` even if out of range
    pub fn read(&mut self, width: Width) -> Result<u16, Error> {
        let value = self.peek(width);
        self.skip(width.bytes());
        value
    }

    pub fn peek_u8(&self) -> Result<u8, Error> {
        match self.peek_array::<1>() {
            Some([b]) => Ok(b),
            None => self.truncated(Width::U8).map(|_| 0),
        }
    }

    pub fn peek_be_u16(&self) -> Result<u16, Error> {
        self.peek(Width::U16)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let value = self.peek_u8();
        self.skip(Width::U8.bytes());
        value
    }

    pub fn read_be_u16(&mut self) -> Result<u16, Error> {
        self.read(Width::U16)
    }

    /// Two byte value used for marker dispatch
    ///
    /// Uses the same bounds as [`Self::peek`] but ignores the truncation
    /// policy: running out of data is never an error while looking for
    /// markers.
    pub fn peek_marker(&self) -> Option<u16> {
        self.peek_array::<2>().map(u16::from_be_bytes)
    }

    /// Same as [`Self::peek_marker`] but also accepts a marker that ends
    /// exactly at the end of the data
    pub fn peek_complete_marker(&self) -> Option<u16> {
        let end = self.position.checked_add(2)?;
        let bytes = self.data.get(self.position..end)?;
        Some(u16::from_be_bytes(bytes.try_into().ok()?))
    }

    /// Move one byte forward
    pub fn advance(&mut self) {
        self.skip(1);
    }

    pub fn skip(&mut self, n: usize) {
        self.position = self.position.saturating_add(n);
    }

    /// Position is a valid index or one past the end
    pub fn has_next(&self) -> bool {
        self.position <= self.data.len()
    }

    pub fn has_lookahead(&self) -> bool {
        self.position <= LOOKAHEAD || self.position.saturating_sub(LOOKAHEAD) < self.data.len()
    }

    fn peek_array<const N: usize>(&self) -> Option<[u8; N]> {
        let end = self.position.checked_add(N)?;

        let in_range = if N == 1 {
            end <= self.data.len()
        } else {
            end < self.data.len()
        };

        if !in_range {
            return None;
        }

        self.data.get(self.position..end)?.try_into().ok()
    }

    fn truncated(&self, width: Width) -> Result<u16, Error> {
        match self.truncation {
            TruncatedRead::ReturnZero => Ok(0),
            TruncatedRead::Fail => Err(Error::TruncatedRead {
                position: self.position,
                width: width.bytes(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_is_idempotent() {
        let cursor = Cursor::new(&[0xAB, 0xCD, 0xEF]);
        assert_eq!(cursor.peek(Width::U16).unwrap(), 0xABCD);
        assert_eq!(cursor.peek(Width::U16).unwrap(), 0xABCD);
        assert_eq!(cursor.peek(Width::U8).unwrap(), 0xAB);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn read_advances_by_width() {
        let mut cursor = Cursor::new(&[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(cursor.read(Width::U8).unwrap(), 0x12);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read(Width::U16).unwrap(), 0x3456);
        assert_eq!(cursor.position(), 3);

        // Out of range, still consumes the full width
        assert_eq!(cursor.read(Width::U16).unwrap(), 0);
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.read_u8().unwrap(), 0);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn multi_byte_exact_fit_is_out_of_range() {
        let cursor = Cursor::new(&[0xFF, 0xD8]);
        assert_eq!(cursor.peek_be_u16().unwrap(), 0);
        assert_eq!(cursor.peek_marker(), None);
        assert_eq!(cursor.peek_complete_marker(), Some(0xFFD8));

        let cursor = Cursor::new(&[0xFF, 0xD8, 0x00]);
        assert_eq!(cursor.peek_be_u16().unwrap(), 0xFFD8);
    }

    #[test]
    fn single_byte_bounds() {
        let mut cursor = Cursor::new(&[0x42]);
        assert_eq!(cursor.peek_u8().unwrap(), 0x42);
        cursor.advance();
        assert_eq!(cursor.peek_u8().unwrap(), 0);
    }

    #[test]
    fn fail_policy() {
        let mut cursor = Cursor::with_truncation(&[0x01, 0x02], TruncatedRead::Fail);
        assert!(matches!(
            cursor.peek_be_u16(),
            Err(Error::TruncatedRead {
                position: 0,
                width: 2
            })
        ));
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u8().unwrap(), 0x02);
        assert!(matches!(
            cursor.read_u8(),
            Err(Error::TruncatedRead {
                position: 2,
                width: 1
            })
        ));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn has_next_and_lookahead() {
        let mut cursor = Cursor::new(&[]);
        assert!(cursor.has_next());
        assert!(cursor.has_lookahead());
        cursor.advance();
        assert!(!cursor.has_next());

        let mut cursor = Cursor::new(&[0; 3]);
        cursor.skip(12);
        assert!(cursor.has_lookahead());
        cursor.skip(1);
        assert!(!cursor.has_lookahead());
    }
}
