use std::io;

use byteorder::WriteBytesExt;
use bytes::Buf;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::crypto::hash::HashAlgorithm;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::registry::{registry, AlgorithmId};
use crate::errors::{format_err, invalid_argument_err, unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{KeyId, Mpi};

/// Length of the hashed material of a v3 signature: type and creation time.
/// The format stores it as a single octet that must hold exactly this value.
const HASHED_LEN: u8 = 5;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SignatureVersion {
    /// Deprecated
    V2,
    V3,
}

impl SignatureVersion {
    pub fn from_u8(version: u8) -> Option<Self> {
        match version {
            2 => Some(SignatureVersion::V2),
            3 => Some(SignatureVersion::V3),
            _ => None,
        }
    }
}

impl From<SignatureVersion> for u8 {
    fn from(value: SignatureVersion) -> Self {
        match value {
            SignatureVersion::V2 => 2,
            SignatureVersion::V3 => 3,
        }
    }
}

/// Signature type octet.
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.2.1>
#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SignatureType {
    /// Signature of a binary document.
    Binary = 0x00,
    /// Signature of a canonical text document.
    Text = 0x01,
    /// Standalone signature.
    Standalone = 0x02,
    /// Generic certification of a User ID and Public-Key packet.
    CertGeneric = 0x10,
    /// Persona certification of a User ID and Public-Key packet.
    CertPersona = 0x11,
    /// Casual certification of a User ID and Public-Key packet.
    CertCasual = 0x12,
    /// Positive certification of a User ID and Public-Key packet.
    CertPositive = 0x13,
    /// Subkey Binding Signature
    SubkeyBinding = 0x18,
    /// Primary Key Binding Signature
    KeyBinding = 0x19,
    /// Signature directly on a key
    Key = 0x1F,
    /// Key revocation signature
    KeyRevocation = 0x20,
    /// Subkey revocation signature
    SubkeyRevocation = 0x28,
    /// Certification revocation signature
    CertRevocation = 0x30,
    /// Timestamp signature.
    Timestamp = 0x40,
    /// Third-Party Confirmation signature.
    ThirdParty = 0x50,

    #[num_enum(catch_all)]
    Other(u8),
}

/// The algorithm specific signature value.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SignatureBytes {
    Rsa(Mpi),
    Dsa { r: Mpi, s: Mpi },
}

impl SignatureBytes {
    fn matches(&self, alg: PublicKeyAlgorithm) -> bool {
        match self {
            SignatureBytes::Rsa(_) => alg.is_rsa(),
            SignatureBytes::Dsa { .. } => alg == PublicKeyAlgorithm::DSA,
        }
    }
}

impl Serialize for SignatureBytes {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            SignatureBytes::Rsa(v) => v.to_writer(writer),
            SignatureBytes::Dsa { r, s } => {
                r.to_writer(writer)?;
                s.to_writer(writer)
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            SignatureBytes::Rsa(v) => v.write_len(),
            SignatureBytes::Dsa { r, s } => r.write_len() + s.write_len(),
        }
    }
}

/// A version 2 or 3 signature packet.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.2.2>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureV3 {
    version: SignatureVersion,
    typ: SignatureType,
    created: DateTime<Utc>,
    issuer: KeyId,
    pub_alg: PublicKeyAlgorithm,
    hash_alg: HashAlgorithm,
    signed_hash_value: [u8; 2],
    signature: Option<SignatureBytes>,
}

fn ensure_signing_alg(alg: PublicKeyAlgorithm) -> Result<()> {
    if !(alg.is_rsa() || alg == PublicKeyAlgorithm::DSA) {
        unsupported_err!("public key algorithm {:?} for v3 signatures", alg);
    }
    Ok(())
}

impl SignatureV3 {
    /// Creates an unsigned signature, the value is added with [`Self::set_signature`].
    pub fn new(
        version: SignatureVersion,
        typ: SignatureType,
        created: DateTime<Utc>,
        issuer: KeyId,
        pub_alg: PublicKeyAlgorithm,
        hash_alg: HashAlgorithm,
        signed_hash_value: [u8; 2],
    ) -> Result<Self> {
        ensure_signing_alg(pub_alg)?;
        let hash_alg = registry().hash(hash_alg.id())?;
        // v3 signatures can only carry 32 bit timestamps.
        let _ = u32::try_from(created.timestamp())?;

        Ok(SignatureV3 {
            version,
            typ,
            created,
            issuer,
            pub_alg,
            hash_alg,
            signed_hash_value,
            signature: None,
        })
    }

    /// Parses the body of a v2 or v3 signature packet.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = i.read_u8()?;
        let Some(version) = SignatureVersion::from_u8(version) else {
            unsupported_err!("signature packet version {}", version);
        };

        let hashed_len = i.read_u8()?;
        if hashed_len != HASHED_LEN {
            unsupported_err!("invalid hashed material length {}", hashed_len);
        }

        let typ = i.read_u8().map(SignatureType::from)?;
        let created = i
            .read_be_u32()
            .map(|v| Utc.timestamp_opt(i64::from(v), 0).single())?
            .ok_or_else(|| format_err!("invalid signature creation time"))?;
        let issuer = KeyId::from(i.read_array::<8>()?);

        let pub_alg = registry().public_key(i.read_u8()?)?;
        ensure_signing_alg(pub_alg)?;
        let hash_alg = registry().hash(i.read_u8()?)?;
        let signed_hash_value = i.read_array::<2>()?;

        let signature = match pub_alg {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSASign
            | PublicKeyAlgorithm::RSAEncrypt => SignatureBytes::Rsa(Mpi::from_buf(&mut i)?),
            PublicKeyAlgorithm::DSA => {
                let r = Mpi::from_buf(&mut i)?;
                let s = Mpi::from_buf(&mut i)?;
                SignatureBytes::Dsa { r, s }
            }
            _ => unreachable!("{:?} passed the signing algorithm check", pub_alg),
        };
        debug!(
            "v3 signature {:?} by {} ({:?}, {})",
            typ, issuer, pub_alg, hash_alg
        );

        Ok(SignatureV3 {
            version,
            typ,
            created,
            issuer,
            pub_alg,
            hash_alg,
            signed_hash_value,
            signature: Some(signature),
        })
    }

    pub fn from_slice(input: &[u8]) -> Result<Self> {
        Self::from_buf(input)
    }

    /// Installs the value produced by a signer. Its shape must match the
    /// public key algorithm.
    pub fn set_signature(&mut self, signature: SignatureBytes) -> Result<()> {
        if !signature.matches(self.pub_alg) {
            invalid_argument_err!(
                "{:?} signature value for a {:?} signature",
                signature,
                self.pub_alg
            );
        }
        self.signature = Some(signature);

        Ok(())
    }

    pub fn version(&self) -> SignatureVersion {
        self.version
    }

    pub fn typ(&self) -> SignatureType {
        self.typ
    }

    pub fn created(&self) -> &DateTime<Utc> {
        &self.created
    }

    pub fn issuer(&self) -> &KeyId {
        &self.issuer
    }

    pub fn pub_alg(&self) -> PublicKeyAlgorithm {
        self.pub_alg
    }

    pub fn hash_alg(&self) -> HashAlgorithm {
        self.hash_alg
    }

    /// Leftmost 16 bits of the signed hash value.
    pub fn signed_hash_value(&self) -> [u8; 2] {
        self.signed_hash_value
    }

    pub fn signature(&self) -> Option<&SignatureBytes> {
        self.signature.as_ref()
    }

    /// The material a verifier appends to the hashed data: type and creation time.
    pub fn hashed_data(&self) -> Result<[u8; 5]> {
        let mut out = [0u8; 5];
        out[0] = self.typ.into();
        out[1..].copy_from_slice(&u32::try_from(self.created.timestamp())?.to_be_bytes());
        Ok(out)
    }

    /// Writes everything after the version and hashed length octets:
    /// hashed material, issuer, algorithms, hash tag and the signature value.
    pub fn to_writer_body<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let signature = self.signed()?;

        writer.write_all(&self.hashed_data()?)?;
        writer.write_all(self.issuer.as_ref())?;
        writer.write_u8(self.pub_alg.id())?;
        writer.write_u8(self.hash_alg.id())?;
        writer.write_all(&self.signed_hash_value)?;
        signature.to_writer(writer)?;

        Ok(())
    }

    /// The signature value, if one is set and fits the algorithm.
    fn signed(&self) -> Result<&SignatureBytes> {
        let Some(signature) = &self.signature else {
            invalid_argument_err!("must sign before serialize");
        };
        if !signature.matches(self.pub_alg) {
            invalid_argument_err!("signature value does not match {:?}", self.pub_alg);
        }

        Ok(signature)
    }

    fn body_len(&self) -> usize {
        5 + 8 + 4 + self.signature.as_ref().map(|s| s.write_len()).unwrap_or(0)
    }
}

/// Writes the complete packet body, starting with the version octet.
impl Serialize for SignatureV3 {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.signed()?;
        writer.write_u8(self.version.into())?;
        writer.write_u8(HASHED_LEN)?;
        self.to_writer_body(writer)
    }

    fn write_len(&self) -> usize {
        2 + self.body_len()
    }
}
