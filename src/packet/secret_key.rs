use std::io;

use bytes::Buf;
use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;

use crate::crypto::ecc_curve::ECCCurve;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::rsa::SecretKey as RsaSecretKey;
use crate::errors::{invalid_argument_err, unsupported_err, Result};
use crate::packet::{PacketHeader, PublicKey};
use crate::ser::Serialize;
use crate::types::{
    Fingerprint, KeyId, KeyVersion, Mpi, Password, PlainSecretParams, PublicParams,
    SecretKeyRepr, SecretParams, Tag,
};

/// A secret key or secret subkey packet.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.5.3>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey {
    details: PublicKey,
    secret_params: SecretParams,
    subkey: bool,
}

impl SecretKey {
    pub fn new(details: PublicKey, secret_params: SecretParams, subkey: bool) -> Self {
        SecretKey {
            details,
            secret_params,
            subkey,
        }
    }

    /// A v4 secret key for an existing RSA key. The prime slots are kept, the
    /// second one is written first.
    pub fn from_rsa(created_at: DateTime<Utc>, key: &RsaPrivateKey) -> Result<Self> {
        let secret = RsaSecretKey::from_key(key)?;
        let public = PublicParams::RSA {
            n: key.n().into(),
            e: key.e().into(),
        };

        Self::from_plain(created_at, PublicKeyAlgorithm::RSA, public, SecretKeyRepr::RSA(secret))
    }

    /// A v4 secret key for the DSA key `x` with `y = g^x mod p`.
    pub fn from_dsa(
        created_at: DateTime<Utc>,
        p: &BigUint,
        q: &BigUint,
        g: &BigUint,
        y: &BigUint,
        x: BigUint,
    ) -> Result<Self> {
        check_discrete_log(p, g, y, &x)?;
        if &x >= q {
            invalid_argument_err!("dsa secret exceeds the subgroup order");
        }
        let public = PublicParams::DSA {
            p: p.into(),
            q: q.into(),
            g: g.into(),
            y: y.into(),
        };

        Self::from_plain(created_at, PublicKeyAlgorithm::DSA, public, SecretKeyRepr::DSA { x })
    }

    /// A v4 encrypt-only ElGamal secret key for `x` with `y = g^x mod p`.
    pub fn from_elgamal(
        created_at: DateTime<Utc>,
        p: &BigUint,
        g: &BigUint,
        y: &BigUint,
        x: BigUint,
    ) -> Result<Self> {
        check_discrete_log(p, g, y, &x)?;
        let public = PublicParams::Elgamal {
            p: p.into(),
            g: g.into(),
            y: y.into(),
        };

        Self::from_plain(
            created_at,
            PublicKeyAlgorithm::ElgamalEncrypt,
            public,
            SecretKeyRepr::Elgamal { x },
        )
    }

    /// A v4 ECDSA secret key. `point` is the uncompressed SEC1 public point,
    /// which is not checked against `x`.
    pub fn from_ecdsa(
        created_at: DateTime<Utc>,
        curve: ECCCurve,
        point: &[u8],
        x: BigUint,
    ) -> Result<Self> {
        let coord_len = curve.secret_key_length();
        if point.len() != 1 + 2 * coord_len || point[0] != 0x04 {
            invalid_argument_err!("invalid {} public point", curve.name());
        }
        if x.is_zero() || x.bits() > usize::from(curve.nbits()) {
            invalid_argument_err!("invalid {} secret scalar", curve.name());
        }
        let public = PublicParams::ECDSA {
            curve,
            p: Mpi::from_slice(point),
        };

        Self::from_plain(created_at, PublicKeyAlgorithm::ECDSA, public, SecretKeyRepr::ECDSA { x })
    }

    fn from_plain(
        created_at: DateTime<Utc>,
        algorithm: PublicKeyAlgorithm,
        public: PublicParams,
        secret: SecretKeyRepr,
    ) -> Result<Self> {
        // only whole seconds make it onto the wire
        let created_at = created_at.trunc_subsecs(0);
        let details = PublicKey::new(KeyVersion::V4, algorithm, created_at, None, public)?;
        debug!("new {:?} secret key {}", algorithm, details.key_id());

        Ok(SecretKey {
            details,
            secret_params: SecretParams::Plain(PlainSecretParams::from(secret)),
            subkey: false,
        })
    }

    /// Parses the body of a secret key packet (tag 5).
    pub fn from_buf<B: Buf>(i: B) -> Result<Self> {
        Self::from_buf_tagged(i, false)
    }

    /// Parses the body of a secret subkey packet (tag 7).
    pub fn subkey_from_buf<B: Buf>(i: B) -> Result<Self> {
        Self::from_buf_tagged(i, true)
    }

    pub fn from_slice(input: &[u8]) -> Result<Self> {
        Self::from_buf(input)
    }

    fn from_buf_tagged<B: Buf>(mut i: B, subkey: bool) -> Result<Self> {
        let details = PublicKey::from_buf(&mut i)?;
        let secret_params =
            SecretParams::from_buf(&mut i, details.algorithm(), details.public_params())?;
        debug!(
            "secret key {} ({:?}), encrypted: {}",
            details.key_id(),
            details.algorithm(),
            secret_params.is_encrypted()
        );

        Ok(SecretKey {
            details,
            secret_params,
            subkey,
        })
    }

    /// Returns a decrypted copy of this key. Keys that are not encrypted are
    /// returned as they are.
    pub fn unlock(&self, pw: &Password) -> Result<SecretKey> {
        match &self.secret_params {
            SecretParams::Plain(_) => Ok(self.clone()),
            SecretParams::Encrypted(enc) => {
                let plain =
                    enc.unlock(pw, self.details.algorithm(), self.details.public_params())?;

                Ok(SecretKey {
                    details: self.details.clone(),
                    secret_params: SecretParams::Plain(plain),
                    subkey: self.subkey,
                })
            }
        }
    }

    /// Decrypts the key in place.
    ///
    /// On error the key is left unchanged, calling this on a decrypted key is a no-op.
    pub fn decrypt(&mut self, pw: &Password) -> Result<()> {
        if let SecretParams::Encrypted(enc) = &self.secret_params {
            let plain = enc.unlock(pw, self.details.algorithm(), self.details.public_params())?;
            self.secret_params = SecretParams::Plain(plain);
        }

        Ok(())
    }

    pub fn is_encrypted(&self) -> bool {
        self.secret_params.is_encrypted()
    }

    pub fn is_subkey(&self) -> bool {
        self.subkey
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        self.details.created_at()
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.details.algorithm()
    }

    pub fn key_id(&self) -> KeyId {
        self.details.key_id()
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        self.details.fingerprint()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.details
    }

    pub fn secret_params(&self) -> &SecretParams {
        &self.secret_params
    }

    pub fn tag(&self) -> Tag {
        if self.subkey {
            Tag::SecretSubkey
        } else {
            Tag::SecretKey
        }
    }

    fn body_len(&self) -> usize {
        self.details.write_len() + self.secret_params.write_len()
    }
}

fn check_discrete_log(p: &BigUint, g: &BigUint, y: &BigUint, x: &BigUint) -> Result<()> {
    if p <= g || x.is_zero() || y != &g.modpow(x, p) {
        invalid_argument_err!("public value does not match the secret");
    }

    Ok(())
}

/// Writes the framed packet, header included. Only decrypted keys can be written.
impl Serialize for SecretKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        if self.is_encrypted() {
            unsupported_err!("serializing an encrypted secret key");
        }

        PacketHeader::new_fixed(self.tag(), self.body_len())?.to_writer(writer)?;
        self.details.to_writer(writer)?;
        self.secret_params.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        let body = self.body_len();
        PacketHeader::new_fixed(self.tag(), body)
            .map(|h| h.write_len())
            .unwrap_or_default()
            + body
    }
}
