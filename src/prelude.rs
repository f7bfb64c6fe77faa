pub use crate::{
    config::{DecodeConfig, Utf8Policy},
    decoding::{decode, decode_all, decode_with, Decoder},
    errors::{ConversionError, DecodingError},
    float::Float,
    width::{Chunk, StrSize, Width},
    Item, ItemKind,
};
pub use bytes::Bytes;
pub use num_bigint::{BigInt, BigUint};
pub use std::convert::TryFrom;
