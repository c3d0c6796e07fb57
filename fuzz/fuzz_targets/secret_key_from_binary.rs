#![no_main]

use libfuzzer_sys::fuzz_target;
use pgp_keycodec::ser::Serialize;
use pgp_keycodec::{Packet, PacketParser, Password};

// parse framed packets, unlock and write back whatever secret keys come out
fuzz_target!(|data: &[u8]| {
    let pw = Password::from("testing");

    for packet in PacketParser::new(data.to_vec()) {
        let key = match packet {
            Ok(Packet::SecretKey(key)) | Ok(Packet::SecretSubkey(key)) => key,
            _ => continue,
        };

        let _ = key.key_id();
        if let Ok(unlocked) = key.unlock(&pw) {
            let _ = unlocked.to_bytes();
        }
    }
});
