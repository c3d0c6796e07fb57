use std::io;

use log::debug;
use zeroize::Zeroizing;

use crate::crypto::checksum;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::registry::AlgorithmId;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::{ensure_eq, Result};
use crate::ser::Serialize;
use crate::types::{Password, PlainSecretParams, PublicParams, S2kUsage, StringToKey};

/// Passphrase protected secret key material, as found in the packet.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct EncryptedSecretParams {
    /// The encrypted data, including the encrypted integrity trailer.
    #[debug("{}", hex::encode(data))]
    data: Vec<u8>,
    #[debug("{}", hex::encode(iv))]
    iv: Vec<u8>,
    sym_alg: SymmetricKeyAlgorithm,
    s2k: StringToKey,
    usage: S2kUsage,
}

impl EncryptedSecretParams {
    pub fn new(
        data: Vec<u8>,
        iv: Vec<u8>,
        sym_alg: SymmetricKeyAlgorithm,
        s2k: StringToKey,
        usage: S2kUsage,
    ) -> Result<Self> {
        ensure_eq!(iv.len(), sym_alg.block_size(), "iv must be one cipher block");

        Ok(EncryptedSecretParams {
            data,
            iv,
            sym_alg,
            s2k,
            usage,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn sym_alg(&self) -> SymmetricKeyAlgorithm {
        self.sym_alg
    }

    pub fn string_to_key(&self) -> &StringToKey {
        &self.s2k
    }

    pub fn usage(&self) -> S2kUsage {
        self.usage
    }

    /// Decrypts and parses the secret material. `self` is left untouched.
    ///
    /// A wrong passphrase and a damaged ciphertext both surface as the
    /// checksum failure.
    pub fn unlock(
        &self,
        pw: &Password,
        alg: PublicKeyAlgorithm,
        public: &PublicParams,
    ) -> Result<PlainSecretParams> {
        let key = self
            .s2k
            .derive_key(pw.as_bytes(), self.sym_alg.key_size())?;

        let mut plaintext = Zeroizing::new(self.data.clone());
        self.sym_alg
            .decrypt_with_iv_regular(&key, &self.iv, &mut plaintext)?;

        debug!("checking {:?} trailer", self.usage);
        let body = match self.usage {
            S2kUsage::Sha1Checksum => checksum::strip_sha1(&plaintext)?,
            S2kUsage::SimpleChecksum => checksum::strip_simple(&plaintext)?,
        };

        PlainSecretParams::try_from_slice(body, alg, public)
    }
}

impl Serialize for EncryptedSecretParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[self.usage.into(), self.sym_alg.id()])?;
        self.s2k.to_writer(writer)?;
        writer.write_all(&self.iv)?;
        writer.write_all(&self.data)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        2 + self.s2k.write_len() + self.iv.len() + self.data.len()
    }
}
