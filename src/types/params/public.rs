use std::io;

use bytes::Buf;

use crate::crypto::ecc_curve::ECCCurve;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::{ensure, unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Mpi;

/// Represent the public parameters for the different algorithms.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum PublicParams {
    RSA { n: Mpi, e: Mpi },
    DSA { p: Mpi, q: Mpi, g: Mpi, y: Mpi },
    Elgamal { p: Mpi, g: Mpi, y: Mpi },
    /// `p` is the uncompressed SEC1 point.
    ECDSA { curve: ECCCurve, p: Mpi },
}

impl PublicParams {
    /// Parses the public parameters of key.
    pub fn from_buf<B: Buf>(typ: PublicKeyAlgorithm, mut i: B) -> Result<Self> {
        match typ {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let n = Mpi::from_buf(&mut i)?;
                let e = Mpi::from_buf(&mut i)?;
                Ok(PublicParams::RSA { n, e })
            }
            PublicKeyAlgorithm::DSA => {
                let p = Mpi::from_buf(&mut i)?;
                let q = Mpi::from_buf(&mut i)?;
                let g = Mpi::from_buf(&mut i)?;
                let y = Mpi::from_buf(&mut i)?;
                Ok(PublicParams::DSA { p, q, g, y })
            }
            PublicKeyAlgorithm::Elgamal | PublicKeyAlgorithm::ElgamalEncrypt => {
                let p = Mpi::from_buf(&mut i)?;
                let g = Mpi::from_buf(&mut i)?;
                let y = Mpi::from_buf(&mut i)?;
                Ok(PublicParams::Elgamal { p, g, y })
            }
            PublicKeyAlgorithm::ECDSA => {
                // a one-octet size of the following field
                let curve_len = i.read_u8()?;
                let oid = i.read_take(curve_len.into())?;
                let Some(curve) = ECCCurve::from_oid(&oid) else {
                    unsupported_err!("ecdsa curve {}", hex::encode(&oid));
                };

                let p = Mpi::from_buf(&mut i)?;
                let coord_len = curve.secret_key_length();
                ensure!(
                    p.len() == 1 + 2 * coord_len && p.as_ref()[0] == 0x04,
                    "invalid {} public point",
                    curve.name()
                );

                Ok(PublicParams::ECDSA { curve, p })
            }
            _ => unsupported_err!("public key algorithm {:?}", typ),
        }
    }

    /// The algorithm family these parameters belong to.
    pub fn matches(&self, alg: PublicKeyAlgorithm) -> bool {
        match self {
            PublicParams::RSA { .. } => alg.is_rsa(),
            PublicParams::DSA { .. } => alg == PublicKeyAlgorithm::DSA,
            PublicParams::Elgamal { .. } => alg.is_elgamal(),
            PublicParams::ECDSA { .. } => alg == PublicKeyAlgorithm::ECDSA,
        }
    }
}

impl Serialize for PublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PublicParams::RSA { n, e } => {
                n.to_writer(writer)?;
                e.to_writer(writer)?;
            }
            PublicParams::DSA { p, q, g, y } => {
                [p, q, g, y].as_slice().to_writer(writer)?;
            }
            PublicParams::Elgamal { p, g, y } => {
                [p, g, y].as_slice().to_writer(writer)?;
            }
            PublicParams::ECDSA { curve, p } => {
                let oid = curve.oid();
                let oid_len: u8 = oid.len().try_into()?;
                writer.write_all(&[oid_len])?;
                writer.write_all(oid)?;
                p.to_writer(writer)?;
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            PublicParams::RSA { n, e } => n.write_len() + e.write_len(),
            PublicParams::DSA { p, q, g, y } => [p, q, g, y].as_slice().write_len(),
            PublicParams::Elgamal { p, g, y } => [p, g, y].as_slice().write_len(),
            PublicParams::ECDSA { curve, p } => 1 + curve.oid().len() + p.write_len(),
        }
    }
}
