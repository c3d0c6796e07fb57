use std::io;

use bytes::Buf;
use log::debug;
use zeroize::Zeroizing;

use crate::crypto::hash::HashAlgorithm;
use crate::crypto::registry::{registry, AlgorithmId};
use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;

const EXPBIAS: u32 = 6;

/// How the integrity of encrypted secret key material is protected.
///
/// The value is the usage octet that precedes the cipher id in the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S2kUsage {
    /// 254: SHA-1 digest of the plaintext.
    Sha1Checksum,
    /// 255: two octet sum of the plaintext.
    SimpleChecksum,
}

impl S2kUsage {
    pub fn from_u8(usage: u8) -> Option<Self> {
        match usage {
            254 => Some(S2kUsage::Sha1Checksum),
            255 => Some(S2kUsage::SimpleChecksum),
            _ => None,
        }
    }
}

impl From<S2kUsage> for u8 {
    fn from(value: S2kUsage) -> Self {
        match value {
            S2kUsage::Sha1Checksum => 254,
            S2kUsage::SimpleChecksum => 255,
        }
    }
}

/// String-To-Key specifier, turns a passphrase into a symmetric key.
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-3.7>
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringToKey {
    /// Type 0
    Simple { hash_alg: HashAlgorithm },
    /// Type 1
    Salted {
        hash_alg: HashAlgorithm,
        salt: [u8; 8],
    },
    /// Type 3
    IteratedAndSalted {
        hash_alg: HashAlgorithm,
        salt: [u8; 8],
        /// Coded count, see [`StringToKey::count`].
        count: u8,
    },
}

impl StringToKey {
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let typ = i.read_u8()?;
        let hash_alg = registry().hash(i.read_u8()?)?;

        let s2k = match typ {
            0 => StringToKey::Simple { hash_alg },
            1 => StringToKey::Salted {
                hash_alg,
                salt: i.read_array::<8>()?,
            },
            3 => StringToKey::IteratedAndSalted {
                hash_alg,
                salt: i.read_array::<8>()?,
                count: i.read_u8()?,
            },
            _ => unsupported_err!("s2k type {}", typ),
        };

        Ok(s2k)
    }

    pub fn typ(&self) -> u8 {
        match self {
            StringToKey::Simple { .. } => 0,
            StringToKey::Salted { .. } => 1,
            StringToKey::IteratedAndSalted { .. } => 3,
        }
    }

    pub fn hash_alg(&self) -> HashAlgorithm {
        match self {
            StringToKey::Simple { hash_alg }
            | StringToKey::Salted { hash_alg, .. }
            | StringToKey::IteratedAndSalted { hash_alg, .. } => *hash_alg,
        }
    }

    pub fn salt(&self) -> Option<&[u8; 8]> {
        match self {
            StringToKey::Simple { .. } => None,
            StringToKey::Salted { salt, .. } | StringToKey::IteratedAndSalted { salt, .. } => {
                Some(salt)
            }
        }
    }

    /// Number of octets hashed by the iterated variant.
    /// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-3.7.1.3>
    pub fn count(&self) -> Option<usize> {
        match self {
            StringToKey::IteratedAndSalted { count, .. } => Some(decode_count(*count)),
            _ => None,
        }
    }

    /// Derives `key_size` octets from the passphrase.
    ///
    /// Each digest sized chunk of the key is produced by its own hash context,
    /// the n-th context being preloaded with n zero octets.
    pub fn derive_key(&self, passphrase: &[u8], key_size: usize) -> Result<Zeroizing<Vec<u8>>> {
        let hash_alg = self.hash_alg();
        let Some(digest_size) = hash_alg.digest_size() else {
            unsupported_err!("s2k hash {}", hash_alg);
        };
        debug!(
            "s2k type {} hash {} key size {}",
            self.typ(),
            hash_alg,
            key_size
        );

        let mut key = Zeroizing::new(vec![0u8; key_size]);
        let mut zeros = Vec::with_capacity(key_size / digest_size + 1);

        for chunk in key.chunks_mut(digest_size) {
            let mut hasher = hash_alg.new_hasher()?;
            hasher.update(&zeros);

            match self {
                StringToKey::Simple { .. } => {
                    hasher.update(passphrase);
                }
                StringToKey::Salted { salt, .. } => {
                    hasher.update(salt);
                    hasher.update(passphrase);
                }
                StringToKey::IteratedAndSalted { salt, count, .. } => {
                    let data = Zeroizing::new([&salt[..], passphrase].concat());
                    // At least one full copy of salt and passphrase is hashed.
                    let count = decode_count(*count).max(data.len());
                    let full = count / data.len();
                    let tail = count % data.len();

                    for _ in 0..full {
                        hasher.update(&data);
                    }
                    hasher.update(&data[..tail]);
                }
            }

            let digest = Zeroizing::new(hasher.finalize().to_vec());
            chunk.copy_from_slice(&digest[..chunk.len()]);
            zeros.push(0);
        }

        Ok(key)
    }
}

/// Expands a coded count octet.
#[inline]
fn decode_count(c: u8) -> usize {
    ((16u32 + u32::from(c & 15)) << (u32::from(c >> 4) + EXPBIAS)) as usize
}

impl Serialize for StringToKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[self.typ(), self.hash_alg().id()])?;

        match self {
            StringToKey::Simple { .. } => {}
            StringToKey::Salted { salt, .. } => {
                writer.write_all(salt)?;
            }
            StringToKey::IteratedAndSalted { salt, count, .. } => {
                writer.write_all(salt)?;
                writer.write_all(&[*count])?;
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            StringToKey::Simple { .. } => 2,
            StringToKey::Salted { .. } => 10,
            StringToKey::IteratedAndSalted { .. } => 11,
        }
    }
}
