use std::io;

use num_bigint::traits::ModInverse;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{ensure, format_err, invalid_argument_err, Result};
use crate::ser::Serialize;
use crate::types::{secret_mpi_len, write_secret_mpi, Mpi};

/// RSA secret key material, as stored in a secret key packet.
///
/// The two primes are kept in the slots `[second, first]` relative to the order
/// they appear on the wire, which is the layout historical exporters use. The
/// CRT coefficient is `first^-1 mod second`, so writing `d, first, second, u`
/// reproduces the packet the key was read from.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct SecretKey {
    #[debug("..")]
    key: RsaPrivateKey,
    #[debug("..")]
    u: BigUint,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        // rsa 0.9 has no `Zeroize` for `RsaPrivateKey`; it wipes itself on drop.
        self.u.zeroize();
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl SecretKey {
    /// Rebuilds and validates the private key from the public parameters and
    /// the secret values in wire order.
    pub(crate) fn try_from_wire(
        n: &Mpi,
        e: &Mpi,
        d: &[u8],
        first: &[u8],
        second: &[u8],
    ) -> Result<Self> {
        Self::try_from_parts(
            n.into(),
            e.into(),
            BigUint::from_bytes_be(d),
            BigUint::from_bytes_be(first),
            BigUint::from_bytes_be(second),
        )
    }

    /// Takes over a two prime key. Its prime slots are kept as they are, so the
    /// second slot is written first.
    pub fn from_key(key: &RsaPrivateKey) -> Result<Self> {
        let [second, first] = key.primes() else {
            invalid_argument_err!("rsa keys need exactly two primes, got {}", key.primes().len());
        };

        Self::try_from_parts(
            key.n().clone(),
            key.e().clone(),
            key.d().clone(),
            first.clone(),
            second.clone(),
        )
    }

    fn try_from_parts(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        first: BigUint,
        second: BigUint,
    ) -> Result<Self> {
        // A prime of 0 or 1 would make the CRT precomputation divide by zero.
        ensure!(first > BigUint::one(), "invalid rsa prime");
        ensure!(second > BigUint::one(), "invalid rsa prime");
        ensure!(!d.is_zero(), "invalid rsa private exponent");
        ensure!(e > BigUint::one(), "invalid rsa public exponent");
        ensure!(n == &first * &second, "rsa modulus is not the product of its primes");

        let mut de = &d * &e;
        let exponents_match = [&first, &second]
            .into_iter()
            .all(|prime| (&de % (prime - BigUint::one())).is_one());
        de.zeroize();
        ensure!(exponents_match, "rsa exponents do not match the primes");

        let u = first
            .clone()
            .mod_inverse(&second)
            .and_then(|u| u.to_biguint())
            .ok_or_else(|| format_err!("rsa primes are not coprime"))?;

        let key = RsaPrivateKey::from_components(n, e, d, vec![second, first])?;

        Ok(SecretKey { key, u })
    }

    pub fn key(&self) -> &RsaPrivateKey {
        &self.key
    }

    pub fn d(&self) -> &BigUint {
        self.key.d()
    }

    pub fn n(&self) -> &BigUint {
        self.key.n()
    }

    /// The primes in the order they are written to the wire.
    pub fn primes_wire_order(&self) -> (&BigUint, &BigUint) {
        match self.key.primes() {
            [second, first] => (first, second),
            _ => unreachable!("rsa secret key is built from exactly two primes"),
        }
    }

    /// CRT coefficient: first prime inverted modulo the second one.
    pub fn u(&self) -> &BigUint {
        &self.u
    }

}

/// Writes the secret values in wire order: `d`, first prime, second prime, `u`.
impl Serialize for SecretKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let (first, second) = self.primes_wire_order();
        for n in [self.d(), first, second, self.u()] {
            write_secret_mpi(n, writer)?;
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        let (first, second) = self.primes_wire_order();
        [self.d(), first, second, self.u()]
            .into_iter()
            .map(secret_mpi_len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_key_parts() -> (BigUint, BigUint, BigUint, BigUint, BigUint) {
        // p = 61, q = 53, n = 3233, e = 17, d = 2753
        (
            BigUint::from(3233u32),
            BigUint::from(17u32),
            BigUint::from(2753u32),
            BigUint::from(61u32),
            BigUint::from(53u32),
        )
    }

    #[test]
    fn test_rebuild_small_key() {
        let (n, e, d, p, q) = small_key_parts();
        let key = SecretKey::try_from_parts(n.clone(), e, d.clone(), p.clone(), q.clone()).unwrap();

        assert_eq!(key.n(), &n);
        assert_eq!(key.d(), &d);
        assert_eq!(key.primes_wire_order(), (&p, &q));
        // 61 * 20 = 1220 = 23 * 53 + 1
        assert_eq!(key.u(), &BigUint::from(20u32));
        assert_eq!(key.key().primes(), &[q, p]);
    }

    #[test]
    fn test_reject_prime_one() {
        let (_, e, d, p, _) = small_key_parts();
        let one = BigUint::one();

        let err = SecretKey::try_from_parts(p.clone(), e.clone(), d.clone(), p.clone(), one.clone())
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Structural);

        let err = SecretKey::try_from_parts(p.clone(), e, d, one, p).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Structural);
    }

    #[test]
    fn test_reject_mismatched_modulus() {
        let (n, e, d, p, _) = small_key_parts();
        let q = BigUint::from(59u32);
        assert!(SecretKey::try_from_parts(n, e, d, p, q).is_err());
    }

    #[test]
    fn test_from_key_keeps_slots() {
        let (n, e, d, p, q) = small_key_parts();
        let rsa = RsaPrivateKey::from_components(n, e, d, vec![q.clone(), p.clone()]).unwrap();

        let key = SecretKey::from_key(&rsa).unwrap();
        assert_eq!(key.primes_wire_order(), (&p, &q));
        assert_eq!(key.key(), &rsa);

        // d = 2753, p = 61, q = 53, u = 20
        let bytes = key.to_bytes().unwrap();
        assert_eq!(bytes, hex_literal::hex!("000c 0ac1 0006 3d 0006 35 0005 14").to_vec());
        assert_eq!(bytes.len(), key.write_len());
    }

    #[test]
    fn test_zeroize() {
        let (n, e, d, p, q) = small_key_parts();
        let mut key = SecretKey::try_from_parts(n, e, d, p, q).unwrap();
        key.zeroize();
        assert!(key.u().bits() == 0);
    }

    #[test]
    fn test_reject_wrong_exponent() {
        let (n, e, _, p, q) = small_key_parts();
        assert!(SecretKey::try_from_parts(n, e, BigUint::from(2751u32), p, q).is_err());
    }
}
