use crate::errors::{ensure_eq, Result};

/// Eight octet key id.
#[derive(Clone, Copy, Eq, PartialEq, Hash, derive_more::Debug, derive_more::Display)]
#[debug("KeyId({})", hex::encode(_0))]
#[display("{}", hex::encode(_0))]
pub struct KeyId([u8; 8]);

impl AsRef<[u8]> for KeyId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 8]> for KeyId {
    fn from(value: [u8; 8]) -> Self {
        KeyId(value)
    }
}

impl From<u64> for KeyId {
    fn from(value: u64) -> Self {
        KeyId(value.to_be_bytes())
    }
}

impl KeyId {
    pub fn from_slice(input: &[u8]) -> Result<KeyId> {
        ensure_eq!(input.len(), 8, "invalid key id length");
        let mut r = [0u8; 8];
        r.copy_from_slice(input);

        Ok(KeyId(r))
    }

    /// Key id taken from the low 64 bits of a longer value, e.g. a fingerprint
    /// or an RSA modulus. Shorter inputs are left padded with zeros.
    pub fn from_tail(input: &[u8]) -> KeyId {
        let mut r = [0u8; 8];
        let n = input.len().min(8);
        r[8 - n..].copy_from_slice(&input[input.len() - n..]);

        KeyId(r)
    }

    pub fn to_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

/// Key fingerprint.
#[derive(Clone, Eq, PartialEq, Hash, derive_more::Debug)]
pub enum Fingerprint {
    /// MD5 over the RSA modulus and exponent.
    #[debug("V3({})", hex::encode(_0))]
    V3([u8; 16]),
    /// SHA-1 over the framed public key.
    #[debug("V4({})", hex::encode(_0))]
    V4([u8; 20]),
}

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::V3(fp) => &fp[..],
            Self::V4(fp) => &fp[..],
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_upper(self.as_bytes()))
    }
}
