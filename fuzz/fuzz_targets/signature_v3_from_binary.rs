#![no_main]

use libfuzzer_sys::fuzz_target;
use pgp_keycodec::ser::Serialize;
use pgp_keycodec::SignatureV3;

// parsed signatures must write back to the same bytes they came from
fuzz_target!(|data: &[u8]| {
    if let Ok(sig) = SignatureV3::from_slice(data) {
        let _ = sig.hashed_data();
        let out = sig.to_bytes().expect("parsed signatures serialize");
        let reparsed = SignatureV3::from_slice(&out).expect("output parses");
        assert_eq!(sig, reparsed);
    }
});
