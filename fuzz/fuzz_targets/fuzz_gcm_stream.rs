#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tinygcm::{AadPolicy, AesKeySchedule, Gcm, GcmConfig, GcmContext, GhashBackend, LengthLimit};

#[derive(Arbitrary, Debug)]
struct GcmStreamFuzzInput {
    key: [u8; 32],
    key_size: u8,
    iv: Vec<u8>,
    aad: Vec<u8>,
    plaintext: Vec<u8>,
    chunk_sizes: Vec<u8>,
    table_backend: bool,
    compact: bool,
}

fuzz_target!(|input: GcmStreamFuzzInput| {
    let key_len = [16, 24, 32][input.key_size as usize % 3];
    let schedule = match AesKeySchedule::new(&input.key[..key_len]) {
        Ok(schedule) => schedule,
        Err(_) => return,
    };

    let backend = if input.table_backend { GhashBackend::Table } else { GhashBackend::Bitwise };
    let limit = if input.compact { LengthLimit::Compact } else { LengthLimit::Standard };
    let config = GcmConfig::default()
        .with_aad_policy(AadPolicy::Optional)
        .with_ghash_backend(backend)
        .with_length_limit(limit);

    // One-shot result is the reference for the streamed one
    let gcm = Gcm::with_config(schedule.clone(), config);
    let Ok((expected, expected_tag)) = gcm.encrypt_detached(&input.iv, &input.aad, &input.plaintext) else {
        return;
    };

    let mut context = GcmContext::with_config(&schedule, config);
    context.init_encryption(&input.iv, &input.aad).unwrap();
    let mut ciphertext = input.plaintext.clone();
    let mut offset = 0;
    let mut sizes = input.chunk_sizes.iter().cycle();
    while offset < ciphertext.len() {
        let step = sizes.next().map_or(ciphertext.len() - offset, |&s| s.max(1) as usize);
        let end = (offset + step).min(ciphertext.len());
        context.update_in_place(&mut ciphertext[offset..end]).unwrap();
        offset = end;
    }
    let tag = context.finalize_encryption().unwrap();

    assert_eq!(ciphertext, expected);
    assert_eq!(tag, expected_tag);

    let plaintext = gcm
        .decrypt_detached(&input.iv, &input.aad, &ciphertext, tag.as_bytes())
        .unwrap();
    assert_eq!(plaintext, input.plaintext);
});
