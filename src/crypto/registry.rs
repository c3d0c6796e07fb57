//! Lookup of algorithms by their one octet protocol id.
//!
//! The tables are built on first access and never change afterwards, so a
//! [`Registry`] reference can be shared freely between threads.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::crypto::hash::HashAlgorithm;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::{unsupported_err, Result};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::populate);

/// Returns the process wide algorithm registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AlgorithmFamily {
    Hash,
    Cipher,
    PublicKey,
}

/// An algorithm of any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Hash(HashAlgorithm),
    Cipher(SymmetricKeyAlgorithm),
    PublicKey(PublicKeyAlgorithm),
}

/// Common surface of all algorithm identifiers.
pub trait AlgorithmId: Copy {
    const FAMILY: AlgorithmFamily;

    /// The protocol id.
    fn id(self) -> u8;

    /// Whether the primitive can be used in this build.
    fn is_available(self) -> bool;
}

impl AlgorithmId for HashAlgorithm {
    const FAMILY: AlgorithmFamily = AlgorithmFamily::Hash;

    fn id(self) -> u8 {
        self.into()
    }

    fn is_available(self) -> bool {
        HashAlgorithm::is_available(self)
    }
}

impl AlgorithmId for SymmetricKeyAlgorithm {
    const FAMILY: AlgorithmFamily = AlgorithmFamily::Cipher;

    fn id(self) -> u8 {
        self.into()
    }

    fn is_available(self) -> bool {
        SymmetricKeyAlgorithm::is_available(self)
    }
}

impl AlgorithmId for PublicKeyAlgorithm {
    const FAMILY: AlgorithmFamily = AlgorithmFamily::PublicKey;

    fn id(self) -> u8 {
        self.into()
    }

    fn is_available(self) -> bool {
        PublicKeyAlgorithm::is_available(self)
    }
}

impl Algorithm {
    pub fn id(&self) -> u8 {
        match self {
            Algorithm::Hash(alg) => alg.id(),
            Algorithm::Cipher(alg) => alg.id(),
            Algorithm::PublicKey(alg) => alg.id(),
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            Algorithm::Hash(_) => AlgorithmFamily::Hash,
            Algorithm::Cipher(_) => AlgorithmFamily::Cipher,
            Algorithm::PublicKey(_) => AlgorithmFamily::PublicKey,
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            Algorithm::Hash(alg) => alg.is_available(),
            Algorithm::Cipher(alg) => alg.is_available(),
            Algorithm::PublicKey(alg) => alg.is_available(),
        }
    }
}

/// Read-only catalog of the algorithms known to this crate, per family.
#[derive(Debug)]
pub struct Registry {
    hashes: BTreeMap<u8, HashAlgorithm>,
    ciphers: BTreeMap<u8, SymmetricKeyAlgorithm>,
    public_keys: BTreeMap<u8, PublicKeyAlgorithm>,
}

fn table<T: AlgorithmId>(algs: &[T]) -> BTreeMap<u8, T> {
    algs.iter().map(|alg| (alg.id(), *alg)).collect()
}

impl Registry {
    fn populate() -> Self {
        Registry {
            hashes: table(&HashAlgorithm::KNOWN),
            ciphers: table(&SymmetricKeyAlgorithm::KNOWN),
            public_keys: table(&PublicKeyAlgorithm::KNOWN),
        }
    }

    pub fn hash(&self, id: u8) -> Result<HashAlgorithm> {
        match self.hashes.get(&id) {
            Some(alg) => Ok(*alg),
            None => unsupported_err!("hash function {}", id),
        }
    }

    pub fn cipher(&self, id: u8) -> Result<SymmetricKeyAlgorithm> {
        match self.ciphers.get(&id) {
            Some(alg) => Ok(*alg),
            None => unsupported_err!("unknown cipher: {}", id),
        }
    }

    pub fn public_key(&self, id: u8) -> Result<PublicKeyAlgorithm> {
        match self.public_keys.get(&id) {
            Some(alg) => Ok(*alg),
            None => unsupported_err!("public key algorithm {}", id),
        }
    }

    pub fn lookup(&self, family: AlgorithmFamily, id: u8) -> Option<Algorithm> {
        match family {
            AlgorithmFamily::Hash => self.hashes.get(&id).copied().map(Algorithm::Hash),
            AlgorithmFamily::Cipher => self.ciphers.get(&id).copied().map(Algorithm::Cipher),
            AlgorithmFamily::PublicKey => {
                self.public_keys.get(&id).copied().map(Algorithm::PublicKey)
            }
        }
    }

    /// All registered algorithms of a family, ordered by id.
    pub fn family(&self, family: AlgorithmFamily) -> Vec<Algorithm> {
        match family {
            AlgorithmFamily::Hash => self.hashes.values().copied().map(Algorithm::Hash).collect(),
            AlgorithmFamily::Cipher => self
                .ciphers
                .values()
                .copied()
                .map(Algorithm::Cipher)
                .collect(),
            AlgorithmFamily::PublicKey => self
                .public_keys
                .values()
                .copied()
                .map(Algorithm::PublicKey)
                .collect(),
        }
    }
}

/// Returns the entries of `a` whose id also appears in `b`, in the order of `a`.
///
/// Used to negotiate between two preference lists, the first list wins.
pub fn intersect_preserve_order<T: AlgorithmId>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter()
        .copied()
        .filter(|x| b.iter().any(|y| y.id() == x.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let reg = registry();
        assert_eq!(reg.hash(2).unwrap(), HashAlgorithm::Sha1);
        assert_eq!(reg.cipher(9).unwrap(), SymmetricKeyAlgorithm::AES256);
        assert_eq!(reg.public_key(17).unwrap(), PublicKeyAlgorithm::DSA);

        for id in [0, 4, 5, 12, 110] {
            assert!(reg.hash(id).is_err(), "hash {id}");
        }
        for id in [0, 5, 6, 14, 110] {
            assert!(reg.cipher(id).is_err(), "cipher {id}");
        }
        assert!(reg.public_key(22).is_err());
        assert!(reg.public_key(18).is_err());

        let alg = reg.lookup(AlgorithmFamily::Cipher, 3).unwrap();
        assert_eq!(alg, Algorithm::Cipher(SymmetricKeyAlgorithm::CAST5));
        assert_eq!(alg.id(), 3);
        assert_eq!(alg.family(), AlgorithmFamily::Cipher);
        assert_eq!(reg.lookup(AlgorithmFamily::Hash, 3).unwrap().family(), AlgorithmFamily::Hash);
    }

    #[test]
    fn test_ids_unique_per_family() {
        let reg = registry();
        assert_eq!(reg.family(AlgorithmFamily::Hash).len(), HashAlgorithm::KNOWN.len());
        assert_eq!(
            reg.family(AlgorithmFamily::Cipher).len(),
            SymmetricKeyAlgorithm::KNOWN.len()
        );
        assert_eq!(
            reg.family(AlgorithmFamily::PublicKey).len(),
            PublicKeyAlgorithm::KNOWN.len()
        );
    }

    #[test]
    fn test_sizes_known_for_unavailable() {
        let reg = registry();
        let idea = reg.cipher(1).unwrap();
        assert_eq!(idea.block_size(), 8);
        assert_eq!(idea.key_size(), 16);
        assert_eq!(Algorithm::Cipher(idea).is_available(), cfg!(feature = "idea"));
    }

    #[test]
    fn test_intersect_preserve_order() {
        use HashAlgorithm::*;

        assert_eq!(
            intersect_preserve_order(&[Md5, Sha1, Sha256], &[Sha256, Md5]),
            vec![Md5, Sha256]
        );
        assert_eq!(
            intersect_preserve_order(&[Sha512, Sha256], &[Sha1]),
            Vec::<HashAlgorithm>::new()
        );
        assert_eq!(
            intersect_preserve_order::<HashAlgorithm>(&[], &[Sha1]),
            vec![]
        );
        assert_eq!(
            intersect_preserve_order(&[Sha1, Sha1, Md5], &[Sha1]),
            vec![Sha1, Sha1]
        );

        use SymmetricKeyAlgorithm::*;
        assert_eq!(
            intersect_preserve_order(&[AES256, CAST5, TripleDES], &[TripleDES, AES256]),
            vec![AES256, TripleDES]
        );
    }
}
