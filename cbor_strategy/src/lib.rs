//! Proptest strategies producing encoded CBOR together with the item it decodes to.

use bytes::Bytes;
use cbor_tree::{
    float::Float,
    width::{Chunk, Chunks, StrSize, Width},
    Item,
};
use num_bigint::{BigInt, BigUint};
use proptest::prelude::*;

/// An encoding and the item expected from decoding it.
pub type Encoded = (Vec<u8>, Item);

/// Writes a header byte for `major` (0 through 7) carrying `value` with `width`.
///
/// # Panics
///
/// Panics if `value` does not fit in `width`.
pub fn head(major: u8, value: u64, width: Width) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    let info = match width {
        Width::Inline => {
            assert!(value < 0x18, "{} does not fit inline", value);
            value as u8
        }
        Width::One => 0x18,
        Width::Two => 0x19,
        Width::Four => 0x1a,
        Width::Eight => 0x1b,
    };
    out.push(major << 5 | info);
    let len = width.byte_len();
    if len > 0 {
        assert!(len == 8 || value >> (len * 8) == 0, "{} does not fit in {:?}", value, width);
        out.extend_from_slice(&value.to_be_bytes()[8 - len..]);
    }
    out
}

/// A width able to hold `value`, not necessarily the minimal one.
pub fn arb_width_for(value: u64) -> impl Strategy<Value = Width> {
    let widths: Vec<Width> = [Width::Inline, Width::One, Width::Two, Width::Four, Width::Eight]
        .iter()
        .copied()
        .filter(|w| *w >= Width::minimal_for(value))
        .collect();
    proptest::sample::select(widths)
}

/// arbitrary unsigned integer for use with proptest
pub fn arb_uint() -> impl Strategy<Value = Encoded> {
    any::<u64>().prop_flat_map(|n| {
        arb_width_for(n).prop_map(move |size| {
            let item = Item::Uint {
                size,
                value: BigUint::from(n),
            };
            (head(0, n, size), item)
        })
    })
}

/// arbitrary negative integer for use with proptest
pub fn arb_nint() -> impl Strategy<Value = Encoded> {
    any::<u64>().prop_flat_map(|m| {
        arb_width_for(m).prop_map(move |size| {
            let item = Item::Nint {
                size,
                value: BigInt::from(-1) - BigInt::from(m),
            };
            (head(1, m, size), item)
        })
    })
}

fn definite_string(major: u8, bytes: Vec<u8>) -> impl Strategy<Value = (Vec<u8>, StrSize, Vec<u8>)> {
    let len = bytes.len() as u64;
    arb_width_for(len).prop_map(move |width| {
        let mut out = head(major, len, width);
        out.extend_from_slice(&bytes);
        (out, StrSize::Definite(width), bytes.clone())
    })
}

fn indefinite_string(major: u8, pieces: Vec<Vec<u8>>) -> impl Strategy<Value = (Vec<u8>, StrSize, Vec<u8>)> {
    let widths: Vec<_> = pieces.iter().map(|p| arb_width_for(p.len() as u64)).collect();
    widths.prop_map(move |widths| {
        let mut out = vec![major << 5 | 0x1f];
        let mut chunks = Chunks::new();
        let mut merged = Vec::new();
        for (piece, width) in pieces.iter().zip(widths) {
            out.extend(head(major, piece.len() as u64, width));
            out.extend_from_slice(piece);
            chunks.push(Chunk {
                len: piece.len(),
                width,
            });
            merged.extend_from_slice(piece);
        }
        out.push(0xff);
        (out, StrSize::Indefinite(chunks), merged)
    })
}

/// arbitrary byte string, definite or chunked, for use with proptest
pub fn arb_bstr() -> impl Strategy<Value = Encoded> {
    let definite = prop::collection::vec(any::<u8>(), 0..300)
        .prop_flat_map(|bytes| definite_string(2, bytes))
        .boxed();
    let indefinite = prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 0..5)
        .prop_flat_map(|pieces| indefinite_string(2, pieces))
        .boxed();
    prop_oneof![definite, indefinite].prop_map(|(out, size, bytes)| {
        let item = Item::Bstr {
            size,
            value: Bytes::from(bytes),
        };
        (out, item)
    })
}

/// arbitrary text string, definite or chunked on character boundaries
pub fn arb_tstr() -> impl Strategy<Value = Encoded> {
    let definite = any::<String>()
        .prop_flat_map(|s| definite_string(3, s.into_bytes()))
        .boxed();
    let indefinite = prop::collection::vec(any::<String>(), 0..5)
        .prop_flat_map(|pieces| indefinite_string(3, pieces.into_iter().map(String::into_bytes).collect()))
        .boxed();
    prop_oneof![definite, indefinite].prop_map(|(out, size, bytes)| {
        let item = Item::Tstr {
            size,
            value: String::from_utf8(bytes).expect("pieces are valid utf-8"),
        };
        (out, item)
    })
}

/// arbitrary single or double precision float, NaN payloads included
pub fn arb_float() -> impl Strategy<Value = Encoded> {
    prop_oneof![
        any::<u32>().prop_map(|bits| {
            let mut out = vec![0xfa];
            out.extend_from_slice(&bits.to_be_bytes());
            (out, Item::Float(Float::Single(bits)))
        }),
        any::<u64>().prop_map(|bits| {
            let mut out = vec![0xfb];
            out.extend_from_slice(&bits.to_be_bytes());
            (out, Item::Float(Float::Double(bits)))
        }),
    ]
}

/// arbitrary `true`, `false`, `null`, or `undefined`
pub fn arb_simple() -> impl Strategy<Value = Encoded> {
    prop_oneof![
        Just((vec![0xf4], Item::Bool(false))),
        Just((vec![0xf5], Item::Bool(true))),
        Just((vec![0xf6], Item::Null)),
        Just((vec![0xf7], Item::Undefined)),
    ]
}

fn concat(parts: &[Vec<u8>]) -> Vec<u8> { parts.iter().flatten().copied().collect() }

/// arbitrary item tree for use with proptest
pub fn arb_item() -> impl Strategy<Value = Encoded> {
    let leaf = prop_oneof![
        arb_uint(),
        arb_nint(),
        arb_bstr(),
        arb_tstr(),
        arb_float(),
        arb_simple(),
    ];
    leaf.prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                // arrays
                (prop::collection::vec(inner.clone(), 0..10), any::<bool>()).prop_flat_map(
                    |(elems, indefinite)| {
                        let count = elems.len() as u64;
                        arb_width_for(count).prop_map(move |width| {
                            let (encs, items): (Vec<_>, Vec<_>) = elems.iter().cloned().unzip();
                            let mut out = if indefinite {
                                vec![0x9f]
                            } else {
                                head(4, count, width)
                            };
                            out.extend(concat(&encs));
                            if indefinite {
                                out.push(0xff);
                            }
                            let size = if indefinite { None } else { Some(width) };
                            (out, Item::Array { size, value: items })
                        })
                    }
                ),
                // maps, keys may repeat
                (
                    prop::collection::vec((inner.clone(), inner.clone()), 0..6),
                    any::<bool>()
                )
                    .prop_flat_map(|(entries, indefinite)| {
                        let count = entries.len() as u64;
                        arb_width_for(count).prop_map(move |width| {
                            let mut out = if indefinite {
                                vec![0xbf]
                            } else {
                                head(5, count, width)
                            };
                            let mut pairs = Vec::with_capacity(entries.len());
                            for ((kenc, k), (venc, v)) in entries.iter().cloned() {
                                out.extend(kenc);
                                out.extend(venc);
                                pairs.push((k, v));
                            }
                            if indefinite {
                                out.push(0xff);
                            }
                            let size = if indefinite { None } else { Some(width) };
                            (out, Item::Map { size, value: pairs })
                        })
                    }),
                // tagged
                (0u8..32, inner).prop_map(|(tag, (enc, item))| {
                    let mut out = vec![0xc0 | tag];
                    out.extend(enc);
                    let item = Item::Tagged {
                        tag,
                        value: Box::new(item),
                    };
                    (out, item)
                }),
            ]
        },
    )
}
