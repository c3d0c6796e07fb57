use std::io;

use bytes::Buf;
use log::debug;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::registry::registry;
use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{
    EncryptedSecretParams, PlainSecretParams, PublicParams, S2kUsage, StringToKey,
};

/// The secret half of a secret key packet, either still locked or usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParams {
    Plain(PlainSecretParams),
    Encrypted(EncryptedSecretParams),
}

impl SecretParams {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, SecretParams::Encrypted(_))
    }

    /// Parses everything following the public key fields.
    ///
    /// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.5.3>
    pub fn from_buf<B: Buf>(
        mut i: B,
        alg: PublicKeyAlgorithm,
        public: &PublicParams,
    ) -> Result<Self> {
        let usage_byte = i.read_u8()?;

        if usage_byte == 0 {
            let data = i.rest();
            let plain = PlainSecretParams::try_from_slice_with_checksum(&data, alg, public)?;
            return Ok(SecretParams::Plain(plain));
        }

        let Some(usage) = S2kUsage::from_u8(usage_byte) else {
            unsupported_err!("deprecated key-derivation indicator {}", usage_byte);
        };

        let sym_alg = registry().cipher(i.read_u8()?)?;
        let block_size = sym_alg.block_size();
        if block_size == 0 {
            unsupported_err!("unsupported cipher in private key: {:?}", sym_alg);
        }

        let s2k = StringToKey::from_buf(&mut i)?;
        let iv = i.read_take(block_size)?;
        let data = i.rest();
        debug!(
            "encrypted secret key: {:?} {:?}, {} bytes",
            sym_alg,
            usage,
            data.len()
        );

        let params = EncryptedSecretParams::new(data.to_vec(), iv.to_vec(), sym_alg, s2k, usage)?;

        Ok(SecretParams::Encrypted(params))
    }
}

impl Serialize for SecretParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            SecretParams::Plain(k) => {
                writer.write_all(&[0])?;
                k.to_writer(writer)
            }
            SecretParams::Encrypted(k) => k.to_writer(writer),
        }
    }

    fn write_len(&self) -> usize {
        match self {
            SecretParams::Plain(k) => 1 + k.write_len(),
            SecretParams::Encrypted(k) => k.write_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::crypto::sym::SymmetricKeyAlgorithm;
    use crate::errors::ErrorKind;
    use crate::types::Mpi;

    fn dsa_public() -> PublicParams {
        PublicParams::DSA {
            p: Mpi::from_slice(&[23]),
            q: Mpi::from_slice(&[11]),
            g: Mpi::from_slice(&[4]),
            y: Mpi::from_slice(&[9]),
        }
    }

    #[test]
    fn test_plain() {
        let raw = hex!("00 0003 06 0009");
        let params = SecretParams::from_buf(&raw[..], PublicKeyAlgorithm::DSA, &dsa_public()).unwrap();
        assert!(!params.is_encrypted());
        assert_eq!(params.to_bytes().unwrap(), raw.to_vec());
    }

    #[test]
    fn test_encrypted_fields() {
        // CAST5, salted s2k with SHA1, 8 byte iv
        let raw = hex!("fe 03 01 02 1112131415161718 a1a2a3a4a5a6a7a8 deadbeef");
        let params = SecretParams::from_buf(&raw[..], PublicKeyAlgorithm::DSA, &dsa_public()).unwrap();
        let SecretParams::Encrypted(ref enc) = params else {
            panic!("expected encrypted params");
        };
        assert_eq!(enc.usage(), S2kUsage::Sha1Checksum);
        assert_eq!(enc.sym_alg(), SymmetricKeyAlgorithm::CAST5);
        assert_eq!(enc.iv(), &hex!("a1a2a3a4a5a6a7a8"));
        assert_eq!(enc.data(), &hex!("deadbeef"));
        assert_eq!(params.to_bytes().unwrap(), raw.to_vec());
    }

    #[test]
    fn test_rejects() {
        // usage byte naming a cipher directly
        let err = SecretParams::from_buf(&hex!("07 0000")[..], PublicKeyAlgorithm::DSA, &dsa_public())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(err.to_string().contains("deprecated key-derivation indicator"));

        // unknown cipher
        let err = SecretParams::from_buf(&hex!("ff 05 0002")[..], PublicKeyAlgorithm::DSA, &dsa_public())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        // plaintext "cipher"
        let err = SecretParams::from_buf(&hex!("ff 00 0002")[..], PublicKeyAlgorithm::DSA, &dsa_public())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        // iv cut short
        let err = SecretParams::from_buf(&hex!("ff 07 0002 0102")[..], PublicKeyAlgorithm::DSA, &dsa_public())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_iv_for_unavailable_cipher() {
        // IDEA: the iv is one 8 byte block whether or not the cipher is linked in
        let raw = hex!("ff 01 0002 0102030405060708 aabb");
        let params = SecretParams::from_buf(&raw[..], PublicKeyAlgorithm::DSA, &dsa_public()).unwrap();
        let SecretParams::Encrypted(enc) = params else {
            panic!("expected encrypted params");
        };
        assert_eq!(enc.iv().len(), 8);
        assert_eq!(enc.data(), &hex!("aabb"));
    }
}
