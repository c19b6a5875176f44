//! Key/value byte encoding
//!
//! The core treats serialization of keys and values as an opaque, injected
//! concern: the log frames raw bytes, and a [`Codec`] turns application
//! types into those bytes and back. Only the length-prefix framing is part
//! of the storage contract; everything inside a payload belongs to the
//! codec.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CordError, Result};

/// A byte encoding for a single application type.
///
/// Implementations are stateless: both operations are associated functions
/// so references can name a codec by type parameter without carrying an
/// instance around.
pub trait Codec {
    /// The application type this codec encodes.
    type Item;

    /// Encode an item to bytes.
    fn encode(item: &Self::Item) -> Result<Vec<u8>>;

    /// Decode an item from exactly the bytes `encode` produced.
    fn decode(bytes: &[u8]) -> Result<Self::Item>;
}

/// The provided codec: bincode over any serde-serializable type.
pub struct Bincode<T>(PhantomData<T>);

impl<T> Codec for Bincode<T>
where
    T: Serialize + DeserializeOwned,
{
    type Item = T;

    fn encode(item: &T) -> Result<Vec<u8>> {
        bincode::serialize(item).map_err(|e| CordError::Codec(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<T> {
        bincode::deserialize(bytes).map_err(|e| CordError::Codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let bytes = Bincode::<String>::encode(&"fools".to_string()).unwrap();
        let back = Bincode::<String>::decode(&bytes).unwrap();
        assert_eq!(back, "fools");
    }

    #[test]
    fn decode_garbage_is_codec_error() {
        // A length prefix claiming more bytes than follow
        let err = Bincode::<String>::decode(&[0xFF; 2]).unwrap_err();
        assert!(matches!(err, CordError::Codec(_)));
    }
}
