/// Elliptic curves usable with ECDSA keys.
/// Ref: <https://www.rfc-editor.org/rfc/rfc6637.html#section-11>
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ECCCurve {
    P256,
    P384,
    P521,
}

impl ECCCurve {
    /// Standard name
    pub fn name(&self) -> &'static str {
        match self {
            ECCCurve::P256 => "NIST P-256",
            ECCCurve::P384 => "NIST P-384",
            ECCCurve::P521 => "NIST P-521",
        }
    }

    /// IETF formatted OID
    pub fn oid_str(&self) -> &'static str {
        match self {
            ECCCurve::P256 => "1.2.840.10045.3.1.7",
            ECCCurve::P384 => "1.3.132.0.34",
            ECCCurve::P521 => "1.3.132.0.35",
        }
    }

    /// DER encoded OID, without tag and length, as it appears on the wire.
    pub fn oid(&self) -> &'static [u8] {
        match self {
            ECCCurve::P256 => &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07],
            ECCCurve::P384 => &[0x2B, 0x81, 0x04, 0x00, 0x22],
            ECCCurve::P521 => &[0x2B, 0x81, 0x04, 0x00, 0x23],
        }
    }

    /// Nominal bit length of the curve
    pub fn nbits(&self) -> u16 {
        match self {
            ECCCurve::P256 => 256,
            ECCCurve::P384 => 384,
            ECCCurve::P521 => 521,
        }
    }

    /// Size in bytes of a secret scalar on this curve.
    pub fn secret_key_length(&self) -> usize {
        usize::from(self.nbits()).div_ceil(8)
    }

    pub fn from_oid(oid: &[u8]) -> Option<Self> {
        [ECCCurve::P256, ECCCurve::P384, ECCCurve::P521]
            .into_iter()
            .find(|curve| curve.oid() == oid)
    }
}
