//! Encoding widths recorded on decoded items.
//!
//! Every length-bearing item remembers how its length (or value) was laid out in the
//! original stream, so that the exact byte layout can be reproduced instead of a
//! canonically minimal one.

use smallvec::SmallVec;

/// How many bytes followed the header byte to carry a value or length.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Width {
    /// The value sat in the low five bits of the header byte.
    Inline,
    /// One following byte.
    One,
    /// Two following bytes, big-endian.
    Two,
    /// Four following bytes, big-endian.
    Four,
    /// Eight following bytes, big-endian.
    Eight,
}

impl Width {
    /// The number of bytes following the header byte.
    ///
    /// # Example
    ///
    /// ```
    /// use cbor_tree::width::Width;
    ///
    /// assert_eq!(Width::Inline.byte_len(), 0);
    /// assert_eq!(Width::Four.byte_len(), 4);
    /// ```
    pub fn byte_len(self) -> usize {
        match self {
            Width::Inline => 0,
            Width::One => 1,
            Width::Two => 2,
            Width::Four => 4,
            Width::Eight => 8,
        }
    }

    /// Maps the additional information bits of a header byte to a width.
    ///
    /// Returns `None` for the reserved values `0x1c..=0x1e` and for the indefinite
    /// marker `0x1f`.
    pub fn from_info(info: u8) -> Option<Width> {
        match info {
            0x00..=0x17 => Some(Width::Inline),
            0x18 => Some(Width::One),
            0x19 => Some(Width::Two),
            0x1a => Some(Width::Four),
            0x1b => Some(Width::Eight),
            _ => None,
        }
    }

    /// The narrowest width able to hold `value`.
    pub fn minimal_for(value: u64) -> Width {
        if value < 0x18 {
            Width::Inline
        } else if value <= u64::from(u8::MAX) {
            Width::One
        } else if value <= u64::from(u16::MAX) {
            Width::Two
        } else if value <= u64::from(u32::MAX) {
            Width::Four
        } else {
            Width::Eight
        }
    }
}

/// One definite-length fragment of an indefinite-length string.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Chunk {
    /// Length of the fragment in bytes.
    pub len: usize,
    /// Width used to encode `len`.
    pub width: Width,
}

/// Chunk list of an indefinite-length string, in encounter order.
pub type Chunks = SmallVec<[Chunk; 4]>;

/// Size information of a byte or text string.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum StrSize {
    /// Length stated upfront with the given width.
    Definite(Width),
    /// Terminated by a break marker; one entry per merged chunk.
    Indefinite(Chunks),
}

impl StrSize {
    pub fn is_indefinite(&self) -> bool {
        match self {
            StrSize::Indefinite(_) => true,
            StrSize::Definite(_) => false,
        }
    }

    /// The recorded chunks, empty for definite-length strings.
    pub fn chunks(&self) -> &[Chunk] {
        match self {
            StrSize::Indefinite(chunks) => chunks,
            StrSize::Definite(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_bits() {
        assert_eq!(Width::from_info(0), Some(Width::Inline));
        assert_eq!(Width::from_info(0x17), Some(Width::Inline));
        assert_eq!(Width::from_info(0x18), Some(Width::One));
        assert_eq!(Width::from_info(0x1b), Some(Width::Eight));

        for reserved in 0x1c..=0x1f {
            assert_eq!(Width::from_info(reserved), None);
        }
    }

    #[test]
    fn minimal_widths() {
        assert_eq!(Width::minimal_for(0), Width::Inline);
        assert_eq!(Width::minimal_for(23), Width::Inline);
        assert_eq!(Width::minimal_for(24), Width::One);
        assert_eq!(Width::minimal_for(256), Width::Two);
        assert_eq!(Width::minimal_for(65_536), Width::Four);
        assert_eq!(Width::minimal_for(u64::MAX), Width::Eight);
    }

    #[test]
    fn chunk_view() {
        let definite = StrSize::Definite(Width::One);
        assert!(!definite.is_indefinite());
        assert!(definite.chunks().is_empty());

        let mut chunks = Chunks::new();
        chunks.push(Chunk { len: 3, width: Width::Inline });
        let indefinite = StrSize::Indefinite(chunks);
        assert!(indefinite.is_indefinite());
        assert_eq!(indefinite.chunks()[0].len, 3);
    }
}
