/// First byte of every marker
pub const MARKER_PREFIX: u8 = 0xFF;

/// Returns `true` if `value` is `0xFF` followed by a byte that can start a
/// marker
///
/// `FF 00` is a stuffed data byte and `FF FF` is fill.
pub fn is_marker_code(value: u16) -> bool {
    let [prefix, code] = value.to_be_bytes();
    prefix == MARKER_PREFIX && !matches!(code, 0x00 | MARKER_PREFIX)
}

// Table B.1
sofscan_common::utils::convertible_enum!(
    #[repr(u16)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Marker {
        /// Baseline DCT
        SOF0 = 0xFFC0,
        /// Extended sequential DCT
        SOF1 = 0xFFC1,
        /// Progressive DCT
        SOF2 = 0xFFC2,
        /// Lossless (sequential)
        SOF3 = 0xFFC3,
        /// Define Huffman table(s)
        DHT = 0xFFC4,
        SOF5 = 0xFFC5,
        SOF6 = 0xFFC6,
        SOF7 = 0xFFC7,
        /// Reserved for JPEG extensions
        JPG = 0xFFC8,
        SOF9 = 0xFFC9,
        SOF10 = 0xFFCA,
        SOF11 = 0xFFCB,
        /// Define arithmetic coding conditioning(s)
        DAC = 0xFFCC,
        SOF13 = 0xFFCD,
        SOF14 = 0xFFCE,
        SOF15 = 0xFFCF,
        RST0 = 0xFFD0,
        RST1 = 0xFFD1,
        RST2 = 0xFFD2,
        RST3 = 0xFFD3,
        RST4 = 0xFFD4,
        RST5 = 0xFFD5,
        RST6 = 0xFFD6,
        RST7 = 0xFFD7,
        /// Start of image
        SOI = 0xFFD8,
        /// End of image
        EOI = 0xFFD9,
        /// Start of scan
        SOS = 0xFFDA,
        DQT = 0xFFDB,
        DNL = 0xFFDC,
        DRI = 0xFFDD,
        DHP = 0xFFDE,
        EXP = 0xFFDF,
        APP0 = 0xFFE0,
        /// Exif, XMP
        APP1 = 0xFFE1,
        /// ICC color profile
        APP2 = 0xFFE2,
        APP3 = 0xFFE3,
        APP4 = 0xFFE4,
        APP5 = 0xFFE5,
        APP6 = 0xFFE6,
        APP7 = 0xFFE7,
        APP8 = 0xFFE8,
        APP9 = 0xFFE9,
        APP10 = 0xFFEA,
        APP11 = 0xFFEB,
        APP12 = 0xFFEC,
        APP13 = 0xFFED,
        /// Adobe
        APP14 = 0xFFEE,
        APP15 = 0xFFEF,
        JPG0 = 0xFFF0,
        JPG1 = 0xFFF1,
        JPG2 = 0xFFF2,
        JPG3 = 0xFFF3,
        JPG4 = 0xFFF4,
        JPG5 = 0xFFF5,
        JPG6 = 0xFFF6,
        JPG7 = 0xFFF7,
        JPG8 = 0xFFF8,
        JPG9 = 0xFFF9,
        JPG10 = 0xFFFA,
        JPG11 = 0xFFFB,
        JPG12 = 0xFFFC,
        JPG13 = 0xFFFD,
        /// Comment
        COM = 0xFFFE,
        /// For temporary private use in arithmetic coding
        TEM = 0xFF01,
    }
);

impl Marker {
    /// Markers that stand alone and are not followed by a length field
    pub fn has_length(self) -> bool {
        !matches!(
            self,
            Self::RST0
                | Self::RST1
                | Self::RST2
                | Self::RST3
                | Self::RST4
                | Self::RST5
                | Self::RST6
                | Self::RST7
                | Self::SOI
                | Self::EOI
                | Self::TEM
        )
    }

    pub fn is_rst(self) -> bool {
        matches!(
            self,
            Self::RST0
                | Self::RST1
                | Self::RST2
                | Self::RST3
                | Self::RST4
                | Self::RST5
                | Self::RST6
                | Self::RST7
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::SOF0 => "Baseline DCT",
            Self::SOF1 => "Extended sequential DCT",
            Self::SOF2 => "Progressive DCT",
            Self::SOF3 => "Lossless (sequential)",
            Self::SOF5 => "Differential sequential DCT",
            Self::SOF6 => "Differential progressive DCT",
            Self::SOF7 => "Differential lossless (sequential)",
            Self::SOF9 => "Extended sequential DCT, arithmetic coding",
            Self::SOF10 => "Progressive DCT, arithmetic coding",
            Self::SOF11 => "Lossless (sequential), arithmetic coding",
            Self::SOF13 => "Differential sequential DCT, arithmetic coding",
            Self::SOF14 => "Differential progressive DCT, arithmetic coding",
            Self::SOF15 => "Differential lossless (sequential), arithmetic coding",
            Self::DHT => "Define Huffman table(s)",
            Self::DAC => "Define arithmetic coding conditioning(s)",
            Self::RST0
            | Self::RST1
            | Self::RST2
            | Self::RST3
            | Self::RST4
            | Self::RST5
            | Self::RST6
            | Self::RST7 => "Restart with modulo 8 count",
            Self::SOI => "Start of image",
            Self::EOI => "End of image",
            Self::SOS => "Start of scan",
            Self::DQT => "Define quantization table(s)",
            Self::DNL => "Define number of lines",
            Self::DRI => "Define restart interval",
            Self::DHP => "Define hierarchical progression",
            Self::EXP => "Expand reference component(s)",
            Self::APP0
            | Self::APP1
            | Self::APP2
            | Self::APP3
            | Self::APP4
            | Self::APP5
            | Self::APP6
            | Self::APP7
            | Self::APP8
            | Self::APP9
            | Self::APP10
            | Self::APP11
            | Self::APP12
            | Self::APP13
            | Self::APP14
            | Self::APP15 => "Reserved for application segments",
            Self::JPG
            | Self::JPG0
            | Self::JPG1
            | Self::JPG2
            | Self::JPG3
            | Self::JPG4
            | Self::JPG5
            | Self::JPG6
            | Self::JPG7
            | Self::JPG8
            | Self::JPG9
            | Self::JPG10
            | Self::JPG11
            | Self::JPG12
            | Self::JPG13 => "Reserved for JPEG extensions",
            Self::COM => "Comment",
            Self::TEM => "For temporary private use in arithmetic coding",
            Self::Unknown(_) => "Reserved",
        }
    }
}
