//! Decoder configuration.

/// Nesting depth allowed by [`DecodeConfig::default`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What to do with text strings that are not valid UTF-8.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Utf8Policy {
    /// Fail with [`DecodingError::InvalidUtf8`](crate::errors::DecodingError::InvalidUtf8).
    Strict,
    /// Replace invalid sequences with U+FFFD.
    ///
    /// Recorded chunk lengths still count the encoded bytes, so they no longer
    /// add up to the length of the decoded text once anything is replaced.
    Lossy,
}

impl Default for Utf8Policy {
    fn default() -> Self { Utf8Policy::Strict }
}

/// Limits and policies applied while decoding.
///
/// # Example
///
/// ```
/// use cbor_tree::prelude::*;
///
/// let config = DecodeConfig::new()
///     .with_max_depth(16)
///     .with_utf8(Utf8Policy::Lossy);
///
/// let (item, rest) = decode_with(&[0x62, 0xff, 0x61], &config).unwrap();
///
/// assert_eq!(item.to_str().unwrap(), "\u{fffd}a");
/// assert!(rest.is_empty());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DecodeConfig {
    /// Deepest nesting level accepted; `None` disables the check.
    pub max_depth: Option<usize>,
    pub utf8: Utf8Policy,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            utf8: Utf8Policy::default(),
        }
    }
}

impl DecodeConfig {
    pub fn new() -> Self { Self::default() }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Removes the depth limit. Deeply nested input may then exhaust the stack.
    pub fn without_depth_limit(mut self) -> Self {
        self.max_depth = None;
        self
    }

    pub fn with_utf8(mut self, policy: Utf8Policy) -> Self {
        self.utf8 = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DecodeConfig::default();
        assert_eq!(config.max_depth, Some(DEFAULT_MAX_DEPTH));
        assert_eq!(config.utf8, Utf8Policy::Strict);
    }

    #[test]
    fn setters() {
        let config = DecodeConfig::new().with_max_depth(3).with_utf8(Utf8Policy::Lossy);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.utf8, Utf8Policy::Lossy);

        assert_eq!(config.without_depth_limit().max_depth, None);
    }
}
