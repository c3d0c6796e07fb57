use num_enum::{FromPrimitive, IntoPrimitive};

/// Available public key algorithms.
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-9.1>
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt and Sign)
    RSA = 1,
    /// DEPRECATED: RSA (Encrypt-Only)
    RSAEncrypt = 2,
    /// DEPRECATED: RSA (Sign-Only)
    RSASign = 3,
    /// Elgamal (Encrypt-Only)
    ElgamalEncrypt = 16,
    /// DSA (Digital Signature Algorithm)
    DSA = 17,
    /// Elliptic Curve: RFC-6637
    ECDH = 18,
    /// ECDSA: RFC-6637
    ECDSA = 19,
    /// DEPRECATED: Elgamal (Encrypt and Sign)
    Elgamal = 20,
    /// Reserved for Diffie-Hellman (X9.42, as defined for IETF-S/MIME)
    DiffieHellman = 21,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl PublicKeyAlgorithm {
    /// Algorithms whose key material this crate can parse and serialize.
    pub const KNOWN: [PublicKeyAlgorithm; 7] = [
        PublicKeyAlgorithm::RSA,
        PublicKeyAlgorithm::RSAEncrypt,
        PublicKeyAlgorithm::RSASign,
        PublicKeyAlgorithm::ElgamalEncrypt,
        PublicKeyAlgorithm::DSA,
        PublicKeyAlgorithm::ECDSA,
        PublicKeyAlgorithm::Elgamal,
    ];

    pub const fn is_rsa(self) -> bool {
        matches!(
            self,
            PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt | PublicKeyAlgorithm::RSASign
        )
    }

    pub const fn is_elgamal(self) -> bool {
        matches!(
            self,
            PublicKeyAlgorithm::ElgamalEncrypt | PublicKeyAlgorithm::Elgamal
        )
    }

    /// Reports whether key material of this algorithm can be handled.
    pub const fn is_available(self) -> bool {
        self.is_rsa()
            || self.is_elgamal()
            || matches!(self, PublicKeyAlgorithm::DSA | PublicKeyAlgorithm::ECDSA)
    }
}
