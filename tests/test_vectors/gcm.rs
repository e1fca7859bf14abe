// GCM Test Vectors for Interoperability
// Standard vectors from the GCM submission (McGrew and Viega), plus special
// cases generated with the RustCrypto aes-gcm crate as a reference.

use aes_gcm::aead::consts::{U1, U12, U16, U8};
use aes_gcm::aead::{AeadInPlace, KeyInit, Nonce};
use aes_gcm::aes::{Aes128, Aes192, Aes256};
use aes_gcm::AesGcm;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::hex_bytes;

/// Test vector structure for GCM operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcmTestVector {
    pub name: String,
    #[serde(with = "hex_bytes")]
    pub key: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub iv: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub aad: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub plaintext: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub tag: Vec<u8>,
}

fn vector(
    name: &str,
    key: &str,
    iv: &str,
    aad: &str,
    plaintext: &str,
    ciphertext: &str,
    tag: &str,
) -> GcmTestVector {
    GcmTestVector {
        name: name.to_string(),
        key: hex::decode(key).unwrap(),
        iv: hex::decode(iv).unwrap(),
        aad: hex::decode(aad).unwrap(),
        plaintext: hex::decode(plaintext).unwrap(),
        ciphertext: hex::decode(ciphertext).unwrap(),
        tag: hex::decode(tag).unwrap(),
    }
}

const TC3_KEY: &str = "feffe9928665731c6d6a8f9467308308";
const TC4_AAD: &str = "feedfacedeadbeeffeedfacedeadbeefabaddad2";
const TC4_PLAINTEXT: &str = "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72\
                             1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39";

/// Standard test vectors for AES-GCM
pub fn standard_test_vectors() -> Vec<GcmTestVector> {
    vec![
        vector(
            "AES-128 Test Case 1",
            "00000000000000000000000000000000",
            "000000000000000000000000",
            "",
            "",
            "",
            "58e2fccefa7e3061367f1d57a4e7455a",
        ),
        vector(
            "AES-128 Test Case 2",
            "00000000000000000000000000000000",
            "000000000000000000000000",
            "",
            "00000000000000000000000000000000",
            "0388dace60b6a392f328c2b971b2fe78",
            "ab6e47d42cec13bdf53a67b21257bddf",
        ),
        vector(
            "AES-128 Test Case 3",
            TC3_KEY,
            "cafebabefacedbaddecaf888",
            "",
            "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72\
             1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b391aafd255",
            "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e\
             21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091473f5985",
            "4d5c2af327cd64a62cf35abd2ba6fab4",
        ),
        vector(
            "AES-128 Test Case 4",
            TC3_KEY,
            "cafebabefacedbaddecaf888",
            TC4_AAD,
            TC4_PLAINTEXT,
            "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e\
             21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091",
            "5bc94fbc3221a5db94fae95ae7121a47",
        ),
        vector(
            "AES-128 Test Case 5 (64-bit IV)",
            TC3_KEY,
            "cafebabefacedbad",
            TC4_AAD,
            TC4_PLAINTEXT,
            "61353b4c2806934a777ff51fa22a4755699b2a714fcdc6f83766e5f97b6c7423\
             73806900e49f24b22b097544d4896b424989b5e1ebac0f07c23f4598",
            "3612d2e79e3b0785561be14aaca2fccb",
        ),
        vector(
            "AES-128 Test Case 6 (480-bit IV)",
            TC3_KEY,
            "9313225df88406e555909c5aff5269aa6a7a9538534f7da1e4c303d2a318a728\
             c3c0c95156809539fcf0e2429a6b525416aedbf5a0de6a57a637b39b",
            TC4_AAD,
            TC4_PLAINTEXT,
            "8ce24998625615b603a033aca13fb894be9112a5c3a211a8ba262a3cca7e2ca7\
             01e4a9a4fba43c90ccdcb281d48c7c6fd62875d2aca417034c34aee5",
            "619cc5aefffe0bfa462af43c1699d050",
        ),
        vector(
            "AES-256 Test Case 13",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "000000000000000000000000",
            "",
            "",
            "",
            "530f8afbc74536b9a963b4f1c4cb738b",
        ),
        vector(
            "AES-256 Test Case 14",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "000000000000000000000000",
            "",
            "00000000000000000000000000000000",
            "cea7403d4d606b6e074ec5d3baf39d18",
            "d0d1c8a799996bf0265b98b5d48ab919",
        ),
    ]
}

/// Encrypt with the reference implementation
fn reference<A: AeadInPlace + KeyInit>(
    name: &str,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> GcmTestVector {
    let cipher = A::new_from_slice(key).expect("reference key");
    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<A>::from_slice(iv), aad, &mut ciphertext)
        .expect("reference encryption");

    GcmTestVector {
        name: name.to_string(),
        key: key.to_vec(),
        iv: iv.to_vec(),
        aad: aad.to_vec(),
        plaintext: plaintext.to_vec(),
        ciphertext,
        tag: tag.to_vec(),
    }
}

fn random_bytes(rng: &mut rand::rngs::StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

/// Special case test vectors: odd lengths, short IVs, truncated tags
pub fn special_case_test_vectors() -> Vec<GcmTestVector> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x6763_6d5f_7465_7374);
    let mut vectors = Vec::new();

    // Single byte of AAD and plaintext with a 192-bit key
    let key = random_bytes(&mut rng, 24);
    let iv = random_bytes(&mut rng, 12);
    vectors.push(reference::<AesGcm<Aes192, U12>>(
        "AES-192 one byte",
        &key,
        &iv,
        &[0x01],
        &[0x02],
    ));

    // 64-bit IV with a 256-bit key and a tail of one byte past two blocks
    let key = random_bytes(&mut rng, 32);
    let iv = random_bytes(&mut rng, 8);
    let aad = random_bytes(&mut rng, 17);
    let plaintext = random_bytes(&mut rng, 33);
    vectors.push(reference::<AesGcm<Aes256, U8>>(
        "AES-256 64-bit IV",
        &key,
        &iv,
        &aad,
        &plaintext,
    ));

    // 8-bit IV
    let key = random_bytes(&mut rng, 16);
    let aad = random_bytes(&mut rng, 3);
    let plaintext = random_bytes(&mut rng, 17);
    vectors.push(reference::<AesGcm<Aes128, U1>>(
        "AES-128 8-bit IV",
        &key,
        &[0xa5],
        &aad,
        &plaintext,
    ));

    // Compact profile boundary: 255 bytes each, 96-bit tag
    let key = random_bytes(&mut rng, 16);
    let iv = random_bytes(&mut rng, 12);
    let aad = random_bytes(&mut rng, 255);
    let plaintext = random_bytes(&mut rng, 255);
    vectors.push(reference::<AesGcm<Aes128, U12, U12>>(
        "AES-128 255-byte message, 96-bit tag",
        &key,
        &iv,
        &aad,
        &plaintext,
    ));

    // Several blocks with a full tag, built for chunking tests
    let key = random_bytes(&mut rng, 16);
    let iv = random_bytes(&mut rng, 12);
    let aad = random_bytes(&mut rng, 48);
    let plaintext = random_bytes(&mut rng, 1000);
    vectors.push(reference::<AesGcm<Aes128, U12, U16>>(
        "AES-128 1000-byte message",
        &key,
        &iv,
        &aad,
        &plaintext,
    ));

    vectors
}
