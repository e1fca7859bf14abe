// Test vectors module for interoperability testing
// Vectors are described with serde so they can be exported as JSON and fed to
// other GCM implementations.

pub mod gcm;

/// Serialize byte strings as lowercase hex
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// Render all vectors as a text report
pub fn generate_all_test_vectors() -> Vec<u8> {
    let mut result = Vec::new();
    result.extend_from_slice(b"tinygcm Test Vectors\n");
    result.extend_from_slice(b"====================\n\n");

    let vectors = gcm::standard_test_vectors()
        .into_iter()
        .chain(gcm::special_case_test_vectors());
    for vector in vectors {
        result.extend_from_slice(format!("{}\n", vector.name).as_bytes());
        for (label, bytes) in [
            ("Key", &vector.key),
            ("IV", &vector.iv),
            ("AAD", &vector.aad),
            ("Plaintext", &vector.plaintext),
            ("Ciphertext", &vector.ciphertext),
            ("Tag", &vector.tag),
        ] {
            result.extend_from_slice(format!("{}: {}\n", label, hex::encode(bytes)).as_bytes());
        }
        result.extend_from_slice(b"\n");
    }

    result
}
