use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use chrono::{DateTime, TimeZone, Utc};
use digest::Digest;
use md5::Md5;
use sha1::Sha1;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::registry::registry;
use crate::errors::{format_err, unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyId, KeyVersion, PublicParams};

/// The public fields shared by public and secret key packets.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.5.2>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    version: KeyVersion,
    algorithm: PublicKeyAlgorithm,
    created_at: DateTime<Utc>,
    /// Validity period in days, v2 and v3 only.
    expiration: Option<u16>,
    public_params: PublicParams,
    fingerprint: Fingerprint,
    key_id: KeyId,
}

impl PublicKey {
    pub fn new(
        version: KeyVersion,
        algorithm: PublicKeyAlgorithm,
        created_at: DateTime<Utc>,
        expiration: Option<u16>,
        public_params: PublicParams,
    ) -> Result<Self> {
        if !public_params.matches(algorithm) {
            unsupported_err!("{:?} parameters for a {:?} key", public_params, algorithm);
        }
        let created = u32::try_from(created_at.timestamp())?;

        let (fingerprint, key_id, expiration) = match version {
            KeyVersion::V2 | KeyVersion::V3 => {
                // Old keys can only be RSA.
                let PublicParams::RSA { n, e } = &public_params else {
                    unsupported_err!("invalid algorithm {:?} for key version {:?}", algorithm, version);
                };
                let mut h = Md5::new();
                h.update(n);
                h.update(e);
                let fp = Fingerprint::V3(h.finalize().into());

                (fp, KeyId::from_tail(n.as_ref()), Some(expiration.unwrap_or_default()))
            }
            KeyVersion::V4 => {
                let mut body = Vec::with_capacity(6 + public_params.write_len());
                body.push(4);
                body.write_u32::<BigEndian>(created)?;
                body.push(algorithm.into());
                public_params.to_writer(&mut body)?;

                let mut h = Sha1::new();
                h.update([0x99]);
                h.update(u16::try_from(body.len())?.to_be_bytes());
                h.update(&body);
                let digest: [u8; 20] = h.finalize().into();

                (Fingerprint::V4(digest), KeyId::from_tail(&digest), None)
            }
            KeyVersion::Other(v) => unsupported_err!("key version {}", v),
        };

        Ok(PublicKey {
            version,
            algorithm,
            created_at,
            expiration,
            public_params,
            fingerprint,
            key_id,
        })
    }

    /// Parses the public key fields, leaving `i` at the first byte after them.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = i.read_u8().map(KeyVersion::from)?;
        if let KeyVersion::Other(v) = version {
            unsupported_err!("key version {}", v);
        }

        let created_at = i
            .read_be_u32()
            .map(|v| Utc.timestamp_opt(i64::from(v), 0).single())?
            .ok_or_else(|| format_err!("invalid created at timestamp"))?;
        let expiration = if version.is_legacy() {
            Some(i.read_be_u16()?)
        } else {
            None
        };
        let algorithm = registry().public_key(i.read_u8()?)?;
        let public_params = PublicParams::from_buf(algorithm, &mut i)?;

        Self::new(version, algorithm, created_at, expiration, public_params)
    }

    pub fn from_slice(input: &[u8]) -> Result<Self> {
        Self::from_buf(input)
    }

    pub fn version(&self) -> KeyVersion {
        self.version
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn expiration(&self) -> Option<u16> {
        self.expiration
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.public_params
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }
}

impl Serialize for PublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.version.into())?;
        writer.write_u32::<BigEndian>(self.created_at.timestamp().try_into()?)?;
        if let Some(expiration) = self.expiration {
            writer.write_u16::<BigEndian>(expiration)?;
        }
        writer.write_u8(self.algorithm.into())?;
        self.public_params.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        let mut sum = 1 + 4 + 1;
        if self.expiration.is_some() {
            sum += 2;
        }
        sum + self.public_params.write_len()
    }
}
