/// 0xe0
pub(crate) const MASK_TYPE: u8 = 0b1110_0000;
/// 0x1f
pub(crate) const MASK_INFO: u8 = 0b0001_1111;
/// 0xf0
pub(crate) const MASK_NIBBLE: u8 = 0b1111_0000;

/// Unsigned integer type bits, 0x00
pub(crate) const TYPE_UINT: u8 = 0b000_00000;
/// Negative integer type bits, 0x20
pub(crate) const TYPE_NINT: u8 = 0b001_00000;
/// Byte string type bits, 0x40
pub(crate) const TYPE_BSTR: u8 = 0b010_00000;
/// Text string type bits, 0x60
pub(crate) const TYPE_TSTR: u8 = 0b011_00000;
/// Array type bits, 0x80
pub(crate) const TYPE_ARRAY: u8 = 0b100_00000;
/// Map type bits, 0xa0
pub(crate) const TYPE_MAP: u8 = 0b101_00000;
/// Tag type bits, 0xc0
pub(crate) const TYPE_TAG: u8 = 0b110_00000;

/// High nibble shared by floats and the recognised simple values.
pub(crate) const NIBBLE_SIMPLE: u8 = 0b1111_0000;

/// Additional information marking an indefinite length.
pub(crate) const INFO_INDEFINITE: u8 = 0b0001_1111;

pub(crate) const SIMPLE_FALSE: u8 = 0xf4;
pub(crate) const SIMPLE_TRUE: u8 = 0xf5;
pub(crate) const SIMPLE_NULL: u8 = 0xf6;
pub(crate) const SIMPLE_UNDEFINED: u8 = 0xf7;

/// Half-precision tag
pub(crate) const HALF: u8 = 0xf9;
/// Single-precision tag
pub(crate) const SINGLE: u8 = 0xfa;
/// Double-precision tag
pub(crate) const DOUBLE: u8 = 0xfb;

/// Terminates indefinite-length items.
pub(crate) const BREAK: u8 = 0xff;
