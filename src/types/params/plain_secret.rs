use std::io;

use log::debug;
use num_bigint::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::checksum::{self, SimpleChecksum};
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::rsa::SecretKey as RsaSecretKey;
use crate::errors::{ensure, Result};
use crate::ser::Serialize;
use crate::types::{read_mpi_slice, secret_mpi_len, write_secret_mpi, PublicParams};
use crate::util::TeeWriter;

/// Decrypted secret key material, one variant per algorithm family.
///
/// Cleared when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, derive_more::Debug)]
pub enum SecretKeyRepr {
    RSA(RsaSecretKey),
    DSA {
        #[debug("..")]
        x: BigUint,
    },
    Elgamal {
        #[debug("..")]
        x: BigUint,
    },
    ECDSA {
        #[debug("..")]
        x: BigUint,
    },
}

/// Secret parameters of an unlocked key.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop, Debug)]
pub struct PlainSecretParams(SecretKeyRepr);

impl PlainSecretParams {
    /// Parses the algorithm specific secret MPIs.
    ///
    /// `data` must not contain the integrity trailer. Callers only get here with
    /// algorithms the public key parser accepted, and `public` was produced for
    /// the same algorithm.
    pub(crate) fn try_from_slice(
        data: &[u8],
        alg: PublicKeyAlgorithm,
        public: &PublicParams,
    ) -> Result<Self> {
        let mut i = data;

        let repr = match alg {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let PublicParams::RSA { n, e } = public else {
                    unreachable!("rsa key with {:?} public parameters", public);
                };
                let d = read_mpi_slice(&mut i)?;
                let first = read_mpi_slice(&mut i)?;
                let second = read_mpi_slice(&mut i)?;
                if !i.is_empty() {
                    // The stored coefficient is recomputed from the primes.
                    let _u = read_mpi_slice(&mut i)?;
                }

                SecretKeyRepr::RSA(RsaSecretKey::try_from_wire(n, e, d, first, second)?)
            }
            PublicKeyAlgorithm::DSA => SecretKeyRepr::DSA {
                x: BigUint::from_bytes_be(read_mpi_slice(&mut i)?),
            },
            PublicKeyAlgorithm::Elgamal | PublicKeyAlgorithm::ElgamalEncrypt => {
                SecretKeyRepr::Elgamal {
                    x: BigUint::from_bytes_be(read_mpi_slice(&mut i)?),
                }
            }
            PublicKeyAlgorithm::ECDSA => SecretKeyRepr::ECDSA {
                x: BigUint::from_bytes_be(read_mpi_slice(&mut i)?),
            },
            _ => unreachable!("no secret key encoding for {:?}", alg),
        };

        ensure!(
            i.is_empty(),
            "trailing data after secret key material: {} bytes",
            i.len()
        );
        debug!("parsed {:?} secret key material", alg);

        Ok(PlainSecretParams(repr))
    }

    /// Parses unencrypted secret material followed by its two octet checksum.
    pub(crate) fn try_from_slice_with_checksum(
        data: &[u8],
        alg: PublicKeyAlgorithm,
        public: &PublicParams,
    ) -> Result<Self> {
        let body = checksum::strip_simple(data)?;
        Self::try_from_slice(body, alg, public)
    }

    pub fn repr(&self) -> &SecretKeyRepr {
        &self.0
    }

    /// Writes the secret MPIs, without checksum.
    fn to_writer_raw<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match &self.0 {
            SecretKeyRepr::RSA(key) => key.to_writer(writer),
            SecretKeyRepr::DSA { x } | SecretKeyRepr::Elgamal { x } | SecretKeyRepr::ECDSA { x } => {
                write_secret_mpi(x, writer)
            }
        }
    }

    fn write_len_raw(&self) -> usize {
        match &self.0 {
            SecretKeyRepr::RSA(key) => key.write_len(),
            SecretKeyRepr::DSA { x } | SecretKeyRepr::Elgamal { x } | SecretKeyRepr::ECDSA { x } => {
                secret_mpi_len(x)
            }
        }
    }

    /// Serialized secret MPIs, without checksum.
    pub fn to_bytes_raw(&self) -> Result<Zeroizing<Vec<u8>>> {
        let mut buf = Zeroizing::new(Vec::with_capacity(self.write_len_raw()));
        self.to_writer_raw(&mut *buf)?;

        Ok(buf)
    }
}

impl From<SecretKeyRepr> for PlainSecretParams {
    fn from(repr: SecretKeyRepr) -> Self {
        PlainSecretParams(repr)
    }
}

/// Writes the secret MPIs followed by their two octet checksum.
impl Serialize for PlainSecretParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let mut hasher = SimpleChecksum::default();
        {
            let mut tee = TeeWriter::new(&mut hasher, writer);
            self.to_writer_raw(&mut tee)?;
        }
        hasher.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.write_len_raw() + 2
    }
}
