//! A custom serde serialize deserialize that uses `0x`-prefixed hex encoding when dealing with a
//! human readable serializer/deserializer, and a fixed size array otherwise.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Data(#[serde(with = "hex_array")] [u8; 96])
//! ```

use serde::{Deserialize, Deserializer, Serializer};
use serde_big_array::BigArray;

pub fn serialize<const N: usize, S>(data: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&format!("0x{}", hex::encode(data)))
    } else {
        // This uses `BigArray::serialize`.
        data.serialize(serializer)
    }
}

pub fn deserialize<'de, const N: usize, D>(deserializer: D) -> Result<[u8; N], D::Error>
where
    D: Deserializer<'de>,
{
    if deserializer.is_human_readable() {
        let str: String = String::deserialize(deserializer)?;
        let vec = decode(&str).map_err(serde::de::Error::custom)?;

        if vec.len() != N {
            return Err(serde::de::Error::custom("Invalid size."));
        }

        let mut result = [0; N];
        result.copy_from_slice(&vec);
        Ok(result)
    } else {
        BigArray::deserialize(deserializer)
    }
}

pub(crate) fn decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}
