//! Dataset persistence.
//!
//! A dataset is written as a [native](native) container: a 16-byte header
//! followed by a postcard-encoded [`Payload`]. Loading revalidates every
//! invariant, and saving a loaded dataset reproduces the same bytes.
//!
//! ```
//! use edurank::data::InteractionDataset;
//! use edurank::IdIndex;
//! use ndarray::array;
//!
//! let ds = InteractionDataset::new(
//!     IdIndex::from_ids(vec!["s1".to_string()]),
//!     IdIndex::from_ids(vec!["q1".to_string(), "q2".to_string()]),
//!     vec![0, 0],
//!     vec![0, 1],
//!     array![0.4, 0.9],
//! )
//! .unwrap();
//!
//! let bytes = ds.to_bytes().unwrap();
//! let loaded = InteractionDataset::from_bytes(&bytes).unwrap();
//! assert_eq!(loaded, ds);
//! assert_eq!(loaded.to_bytes().unwrap(), bytes);
//! ```

pub mod native;
mod payload;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use native::{DeserializeError, FormatFlags, FormatHeader, NativeCodec, SerializeError};
pub use payload::{DatasetPayloadV1, FeaturesPayload, Payload};

use crate::data::InteractionDataset;

impl InteractionDataset {
    /// Encode into the native container.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        let payload = DatasetPayloadV1::from(self);
        NativeCodec::new().serialize(payload.flags(), &Payload::V1(payload))
    }

    /// Decode from the native container.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let (_, payload) = NativeCodec::new().deserialize::<Payload>(bytes)?;
        from_payload(payload)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, DeserializeError> {
        let (_, payload_bytes) = NativeCodec::new().read_from(reader)?;
        from_payload(postcard::from_bytes(&payload_bytes)?)
    }

    /// Write to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SerializeError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        tracing::debug!(path = %path.display(), "saved interaction dataset");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeserializeError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let ds = Self::read_from(&mut reader)?;
        tracing::debug!(
            path = %path.display(),
            observations = ds.n_observations(),
            "loaded interaction dataset"
        );
        Ok(ds)
    }
}

fn from_payload(payload: Payload) -> Result<InteractionDataset, DeserializeError> {
    match payload {
        Payload::V1(v1) => v1
            .into_dataset()
            .map_err(|e| DeserializeError::CorruptPayload(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FeatureTable;
    use crate::IdIndex;
    use ndarray::array;

    fn full_dataset() -> InteractionDataset {
        InteractionDataset::new(
            IdIndex::from_ids(vec!["s1".to_string(), "s2".to_string()]),
            IdIndex::from_ids(vec!["q1".to_string(), "q2".to_string(), "q3".to_string()]),
            vec![0, 1, 1],
            vec![2, 0, 1],
            array![0.25, -0.5, 0.75],
        )
        .unwrap()
        .with_answer_state(array![true, false, true])
        .unwrap()
        .with_player_features(FeatureTable::one_hot(&["it", "math"]))
        .unwrap()
        .with_question_features(
            FeatureTable::new(
                vec!["difficulty".into(), "length".into()],
                array![[1.0, 10.0], [3.0, 20.0], [5.0, 30.0]],
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn optional_columns_survive() {
        let ds = full_dataset();
        let bytes = ds.to_bytes().unwrap();
        let header = FormatHeader::from_bytes(bytes[..native::HEADER_SIZE].try_into().unwrap()).unwrap();
        assert!(header.flags.contains(FormatFlags::HAS_ANSWER_STATE));
        assert!(header.flags.contains(FormatFlags::HAS_PLAYER_FEATURES));
        assert!(header.flags.contains(FormatFlags::HAS_QUESTION_FEATURES));

        let loaded = InteractionDataset::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, ds);
        assert_eq!(loaded.question_features(2).unwrap().to_vec(), vec![5.0, 30.0]);
    }

    #[test]
    fn invalid_payload_is_rejected() {
        // Decodes fine but points at a question that does not exist.
        let payload = Payload::V1(DatasetPayloadV1 {
            players: vec!["s1".into()],
            questions: vec!["q1".into()],
            observation_players: vec![0],
            observation_questions: vec![4],
            weights: vec![1.0],
            answer_state: None,
            player_features: None,
            question_features: None,
        });
        let bytes = NativeCodec::new()
            .serialize(FormatFlags::empty(), &payload)
            .unwrap();
        assert!(matches!(
            InteractionDataset::from_bytes(&bytes),
            Err(DeserializeError::CorruptPayload(_))
        ));
    }

    #[test]
    fn not_a_dataset() {
        assert!(matches!(
            InteractionDataset::from_bytes(b"BSTR\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"),
            Err(DeserializeError::NotADataset)
        ));
    }
}
