use chrono::{TimeZone, Utc};
use hex_literal::hex;
use pgp_keycodec::crypto::hash::HashAlgorithm;
use pgp_keycodec::crypto::public_key::PublicKeyAlgorithm;
use pgp_keycodec::errors::ErrorKind;
use pgp_keycodec::packet::{
    Packet, PacketHeader, SignatureBytes, SignatureType, SignatureV3, SignatureVersion,
};
use pgp_keycodec::ser::Serialize;
use pgp_keycodec::types::{KeyId, Mpi, Tag};
use pgp_keycodec::PacketParser;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// version 3, type 0x13, created 0x5a5a5a5a, issuer 0xa1b2c3d4e5f60718, RSA, SHA-1
const RSA_SIG: [u8; 25] = hex!(
    "03 05 13 5a5a5a5a a1b2c3d4e5f60718 01 02 beef"
    "0020 f00dcafe"
);

fn init() {
    let _ = pretty_env_logger::try_init();
}

#[test]
fn rsa_sha1_signature() {
    init();

    let sig = SignatureV3::from_slice(&RSA_SIG).unwrap();
    assert_eq!(sig.version(), SignatureVersion::V3);
    assert_eq!(sig.typ(), SignatureType::CertPositive);
    assert_eq!(sig.created(), &Utc.timestamp_opt(0x5a5a5a5a, 0).unwrap());
    assert_eq!(sig.issuer(), &KeyId::from(0xa1b2c3d4e5f60718u64));
    assert_eq!(sig.issuer().to_string(), "a1b2c3d4e5f60718");
    assert_eq!(sig.pub_alg(), PublicKeyAlgorithm::RSA);
    assert_eq!(sig.hash_alg(), HashAlgorithm::Sha1);
    assert_eq!(sig.signed_hash_value(), hex!("beef"));

    let Some(SignatureBytes::Rsa(value)) = sig.signature() else {
        panic!("expected an rsa value, got {:?}", sig.signature());
    };
    assert_eq!(value.as_ref(), &hex!("f00dcafe"));

    assert_eq!(sig.to_bytes().unwrap(), RSA_SIG.to_vec());
}

#[test]
fn unknown_signature_type_is_kept() {
    let mut raw = RSA_SIG;
    raw[2] = 0x77;
    let sig = SignatureV3::from_slice(&raw).unwrap();
    assert_eq!(sig.typ(), SignatureType::Other(0x77));
    assert_eq!(sig.to_bytes().unwrap(), raw.to_vec());
}

#[test]
fn dsa_signature() {
    let raw = hex!("02 05 00 00000001 0000000000000001 11 08 0102 0003 05 0004 0a");
    let sig = SignatureV3::from_slice(&raw).unwrap();
    assert_eq!(sig.version(), SignatureVersion::V2);
    assert_eq!(sig.pub_alg(), PublicKeyAlgorithm::DSA);
    assert_eq!(sig.hash_alg(), HashAlgorithm::Sha256);
    assert_eq!(
        sig.signature(),
        Some(&SignatureBytes::Dsa {
            r: Mpi::from_slice(&[5]),
            s: Mpi::from_slice(&[10]),
        })
    );
    assert_eq!(sig.to_bytes().unwrap(), raw.to_vec());

    let mut body = Vec::new();
    sig.to_writer_body(&mut body).unwrap();
    assert_eq!(body, raw[2..].to_vec());
}

#[test]
fn truncated_signature() {
    for len in [0, 1, 2, 10, 19, 21, RSA_SIG.len() - 1] {
        let err = SignatureV3::from_slice(&RSA_SIG[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural, "len {len}");
    }
}

#[test]
fn framed_signature() {
    init();

    // old format header, one octet length
    let mut input = vec![0x88, RSA_SIG.len() as u8];
    input.extend_from_slice(&RSA_SIG);

    let packets: Vec<_> = PacketParser::new(input).collect::<Result<_, _>>().unwrap();
    assert_eq!(packets.len(), 1);
    let Packet::Signature(sig) = &packets[0] else {
        panic!("expected a signature");
    };

    let header = PacketHeader::new_fixed(Tag::Signature, sig.write_len()).unwrap();
    let mut out = header.to_bytes().unwrap();
    sig.to_writer(&mut out).unwrap();
    assert_eq!(out[0], 0xc2);
    assert_eq!(&out[2..], &RSA_SIG[..]);
}

#[test]
fn build_and_sign() {
    let mut sig = SignatureV3::new(
        SignatureVersion::V3,
        SignatureType::Binary,
        Utc.timestamp_opt(0x5a5a5a5a, 0).unwrap(),
        KeyId::from(hex!("a1b2c3d4e5f60718")),
        PublicKeyAlgorithm::RSASign,
        HashAlgorithm::Sha512,
        hex!("0102"),
    )
    .unwrap();
    assert_eq!(sig.hashed_data().unwrap(), hex!("00 5a5a5a5a"));

    let err = sig.to_bytes().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let mut out = Vec::new();
    assert!(sig.to_writer_body(&mut out).is_err());
    assert!(out.is_empty(), "nothing is written for an unsigned signature");
    let err = sig.to_writer(&mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(out.is_empty(), "nothing is written for an unsigned signature");

    sig.set_signature(SignatureBytes::Rsa(Mpi::from_slice(&hex!("00ff"))))
        .unwrap();
    let bytes = sig.to_bytes().unwrap();
    assert_eq!(&bytes[bytes.len() - 3..], &hex!("0008 ff"));
    assert_eq!(SignatureV3::from_slice(&bytes).unwrap(), sig);
}

#[test]
fn build_rejects_algorithms() {
    let created = Utc.timestamp_opt(0, 0).unwrap();
    let err = SignatureV3::new(
        SignatureVersion::V3,
        SignatureType::Binary,
        created,
        KeyId::from(1u64),
        PublicKeyAlgorithm::ECDSA,
        HashAlgorithm::Sha256,
        [0, 0],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);

    let err = SignatureV3::new(
        SignatureVersion::V3,
        SignatureType::Binary,
        created,
        KeyId::from(1u64),
        PublicKeyAlgorithm::RSA,
        HashAlgorithm::Other(42),
        [0, 0],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

proptest! {
    #[test]
    fn header_bytes_are_validated(version: u8, marker: u8) {
        let mut raw = RSA_SIG;
        raw[0] = version;
        raw[1] = marker;

        let res = SignatureV3::from_slice(&raw);
        if (version == 2 || version == 3) && marker == 5 {
            prop_assert!(res.is_ok());
        } else {
            prop_assert_eq!(res.unwrap_err().kind(), ErrorKind::Unsupported);
        }
    }
}
