/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

/// Helper macro for `TryFrom<Item>` implementations that hand the item back on mismatch.
macro_rules! try_from_item {
    ($to:ty, $pat:pat => $val:expr) => {
        impl TryFrom<Item> for $to {
            type Error = Item;

            fn try_from(item: Item) -> Result<$to, Item> {
                match item {
                    $pat => Ok($val),
                    other => Err(other),
                }
            }
        }
    };
}

/// Writes `bytes` as a diagnostic-notation hex string, e.g. `h'01ff'`.
pub(crate) fn fmt_hex(f: &mut std::fmt::Formatter, bytes: &[u8]) -> std::fmt::Result {
    write!(f, "h'")?;
    for b in bytes {
        write!(f, "{:02x}", b)?;
    }
    write!(f, "'")
}
