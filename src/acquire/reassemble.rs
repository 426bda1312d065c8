// src/acquire/reassemble.rs

use crate::error::DecodeError;
use serde_json::Value;

/// Field of the recorder transport object holding the index -> byte entries.
pub const PAYLOAD_FIELD: &str = "arr";

/// Byte positions of a recording as delivered by the browser transport.
///
/// The transport pushes binary data through a JSON channel, so each byte
/// arrives as a separate `(index, value)` entry in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseByteMap {
    entries: Vec<(u64, u8)>,
}

impl SparseByteMap {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u64, u8)>) -> Self {
        Self { entries: pairs.into_iter().collect() }
    }

    /// Reads the recorder transport value.
    ///
    /// `Ok(None)` means "no recording yet": anything that is not an object
    /// with an object-valued `arr` field. Entries that are present but
    /// malformed are a [`DecodeError`].
    pub fn from_transport(value: &Value) -> Result<Option<Self>, DecodeError> {
        let Some(arr) = value.get(PAYLOAD_FIELD).and_then(Value::as_object) else {
            return Ok(None);
        };

        let mut entries = Vec::with_capacity(arr.len());
        for (key, v) in arr {
            let index: u64 = key
                .parse()
                .map_err(|_| DecodeError::Payload(format!("index `{key}` is not a non-negative integer")))?;
            let byte = v
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| DecodeError::Payload(format!("value {v} at index {index} is not a byte")))?;
            entries.push((index, byte));
        }
        Ok(Some(Self { entries }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts by index and concatenates the values.
    ///
    /// With `require_contiguous` the indices must be exactly `0..len`;
    /// otherwise gaps are dropped silently. A repeated index is always an
    /// error since it leaves the byte at that position ambiguous.
    pub fn reassemble(mut self, require_contiguous: bool) -> Result<Vec<u8>, DecodeError> {
        self.entries.sort_unstable_by_key(|&(index, _)| index);

        for pair in self.entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(DecodeError::Payload(format!("index {} appears twice", pair[0].0)));
            }
        }

        if require_contiguous {
            if let Some((pos, &(index, _))) = self
                .entries
                .iter()
                .enumerate()
                .find(|&(pos, &(index, _))| index != pos as u64)
            {
                return Err(DecodeError::Payload(format!(
                    "gap in recording: expected index {pos}, found {index}"
                )));
            }
        }

        Ok(self.entries.into_iter().map(|(_, byte)| byte).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_by_index_not_insertion_order() {
        let map = SparseByteMap::from_pairs([(2, 0x64), (0, 0x52), (1, 0x49)]);
        assert_eq!(map.reassemble(true).unwrap(), vec![0x52, 0x49, 0x64]);
    }

    #[test]
    fn result_is_independent_of_entry_order() {
        let bytes: Vec<u8> = (0..64u8).map(|b| b.wrapping_mul(37)).collect();
        let forward: Vec<(u64, u8)> = bytes.iter().enumerate().map(|(i, &b)| (i as u64, b)).collect();

        let mut reversed = forward.clone();
        reversed.reverse();
        let mut interleaved: Vec<(u64, u8)> = forward.iter().step_by(2).copied().collect();
        interleaved.extend(forward.iter().skip(1).step_by(2).copied());
        let mut rotated = forward.clone();
        rotated.rotate_left(17);

        for order in [forward, reversed, interleaved, rotated] {
            let out = SparseByteMap::from_pairs(order).reassemble(true).unwrap();
            assert_eq!(out, bytes);
        }
    }

    #[test]
    fn transport_object_is_parsed() {
        let value = json!({ "arr": { "2": 100, "0": 82, "1": 73 } });
        let map = SparseByteMap::from_transport(&value).unwrap().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.reassemble(true).unwrap(), b"RId".to_vec());
    }

    #[test]
    fn other_shapes_mean_no_data_yet() {
        for value in [json!(null), json!(42), json!({ "status": "idle" }), json!({ "arr": [1, 2] })] {
            assert!(SparseByteMap::from_transport(&value).unwrap().is_none());
        }
    }

    #[test]
    fn non_integer_index_is_a_decode_error() {
        let value = json!({ "arr": { "0": 1, "one": 2 } });
        assert!(matches!(SparseByteMap::from_transport(&value), Err(DecodeError::Payload(_))));

        let value = json!({ "arr": { "-1": 1 } });
        assert!(SparseByteMap::from_transport(&value).is_err());
    }

    #[test]
    fn out_of_range_value_is_a_decode_error() {
        for bad in [json!(256), json!(-1), json!(1.5), json!("7")] {
            let value = json!({ "arr": { "0": bad } });
            assert!(matches!(SparseByteMap::from_transport(&value), Err(DecodeError::Payload(_))));
        }
    }

    #[test]
    fn gaps_depend_on_contiguity_setting() {
        let gapped = SparseByteMap::from_pairs([(0, 1), (1, 2), (3, 4)]);
        assert!(gapped.clone().reassemble(true).is_err());
        assert_eq!(gapped.reassemble(false).unwrap(), vec![1, 2, 4]);
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let dup = SparseByteMap::from_pairs([(0, 1), (1, 2), (1, 3)]);
        assert!(dup.clone().reassemble(false).is_err());
        assert!(dup.reassemble(true).is_err());
    }

    #[test]
    fn empty_map_reassembles_to_empty_buffer() {
        assert!(SparseByteMap::default().reassemble(true).unwrap().is_empty());
    }
}
