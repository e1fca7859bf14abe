#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tinygcm::{decrypt, encrypt};

#[derive(Arbitrary, Debug)]
struct GcmDecryptFuzzInput {
    key: [u8; 16],
    iv: Vec<u8>,
    aad: Vec<u8>,
    ciphertext: Vec<u8>,
    flip: Option<u16>,
}

fuzz_target!(|input: GcmDecryptFuzzInput| {
    // Arbitrary ciphertexts must be rejected without panicking
    let _ = decrypt(&input.key, &input.iv, &input.aad, &input.ciphertext);

    // A sealed message with one flipped bit never opens
    if let Ok(mut sealed) = encrypt(&input.key, &input.iv, &input.aad, &input.ciphertext) {
        if let Some(flip) = input.flip {
            let bit = flip as usize % (sealed.len() * 8);
            sealed[bit / 8] ^= 1 << (bit % 8);
            assert!(decrypt(&input.key, &input.iv, &input.aad, &sealed).is_err());
        } else {
            let opened = decrypt(&input.key, &input.iv, &input.aad, &sealed).unwrap();
            assert_eq!(opened, input.ciphertext);
        }
    }
});
