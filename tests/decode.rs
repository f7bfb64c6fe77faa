use cbor_strategy::*;
use cbor_tree::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn decode_uint((enc, item) in arb_uint()) {
        let (dec, rest) = decode(&enc).unwrap();

        let width = match &dec {
            Item::Uint { size, .. } => *size,
            other => panic!("decoded {:?}", other),
        };
        // header byte plus the argument bytes
        prop_assert_eq!(enc.len(), 1 + width.byte_len());
        prop_assert!(rest.is_empty());
        prop_assert_eq!(dec, item);
    }

    #[test]
    fn decode_minimal_uint(n in any::<u64>()) {
        let width = Width::minimal_for(n);
        let enc = head(0, n, width);

        let (dec, _) = decode(&enc).unwrap();

        prop_assert_eq!(dec, Item::Uint { size: width, value: BigUint::from(n) });
    }

    #[test]
    fn decode_nint((enc, item) in arb_nint()) {
        let (dec, rest) = decode(&enc).unwrap();

        prop_assert!(rest.is_empty());
        prop_assert!(dec.to_bigint().unwrap() <= BigInt::from(-1));
        prop_assert_eq!(dec, item);
    }

    #[test]
    fn decode_bstr((enc, item) in arb_bstr()) {
        let (dec, rest) = decode(&enc).unwrap();

        prop_assert!(rest.is_empty());
        if let Item::Bstr { size, value } = &dec {
            let chunked: usize = size.chunks().iter().map(|c| c.len).sum();
            if size.is_indefinite() {
                prop_assert_eq!(chunked, value.len());
            }
        }
        prop_assert_eq!(dec, item);
    }

    #[test]
    fn decode_tstr((enc, item) in arb_tstr()) {
        prop_assert_eq!(decode(&enc).unwrap(), (item, &[][..]));
    }

    #[test]
    fn decode_float((enc, item) in arb_float()) {
        prop_assert_eq!(decode(&enc).unwrap(), (item, &[][..]));
    }

    #[test]
    fn decode_tree((enc, item) in arb_item()) {
        let (dec, rest) = decode(&enc).unwrap();

        prop_assert!(rest.is_empty());
        prop_assert_eq!(dec, item);
    }

    #[test]
    fn rest_starts_after_item((enc, item) in arb_item(), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut input = enc.clone();
        input.extend_from_slice(&tail);

        let (dec, rest) = decode(&input).unwrap();

        prop_assert_eq!(dec, item);
        prop_assert_eq!(rest, &tail[..]);
    }

    #[test]
    fn prefixes_are_rejected((enc, _item) in arb_item()) {
        for cut in 0..enc.len() {
            prop_assert!(decode(&enc[..cut]).is_err(), "prefix of {} bytes decoded", cut);
        }
    }

    #[test]
    fn stream((encs, items) in prop::collection::vec(arb_item(), 0..6).prop_map(|v| v.into_iter().unzip::<_, _, Vec<_>, Vec<_>>())) {
        let input: Vec<u8> = encs.concat();

        prop_assert_eq!(decode_all(&input).unwrap(), items);
    }

    #[test]
    fn idempotent(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        // arbitrary input may fail, but always the same way
        prop_assert_eq!(decode(&bytes), decode(&bytes));
    }
}
