use aes::{Aes128, Aes192, Aes256};
use blowfish::Blowfish;
use camellia::{Camellia128, Camellia192, Camellia256};
use cast5::Cast5;
use cfb_mode::{
    cipher::{AsyncStreamCipher, KeyIvInit},
    Decryptor, Encryptor,
};
use cipher::{BlockCipher, BlockEncryptMut};
use des::TdesEde3;
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};
use twofish::Twofish;

use crate::errors::{unsupported_err, Result};

fn decrypt_cfb<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher,
    Decryptor<C>: KeyIvInit,
{
    Decryptor::<C>::new_from_slices(key, iv)?.decrypt(data);
    Ok(())
}

fn encrypt_cfb<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher,
    Encryptor<C>: KeyIvInit,
{
    Encryptor::<C>::new_from_slices(key, iv)?.encrypt(data);
    Ok(())
}

/// Available symmetric key algorithms.
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-9.2>
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SymmetricKeyAlgorithm {
    /// Plaintext or unencrypted data
    Plaintext = 0,
    /// IDEA
    IDEA = 1,
    /// Triple-DES
    TripleDES = 2,
    /// CAST5
    CAST5 = 3,
    /// Blowfish
    Blowfish = 4,
    // 5 & 6 are reserved for DES/SK
    /// AES with 128-bit key
    AES128 = 7,
    /// AES with 192-bit key
    AES192 = 8,
    /// AES with 256-bit key
    AES256 = 9,
    /// Twofish with 256-bit key
    Twofish = 10,
    /// [Camellia](https://tools.ietf.org/html/rfc5581#section-3) with 128-bit key
    Camellia128 = 11,
    /// [Camellia](https://tools.ietf.org/html/rfc5581#section-3) with 192-bit key
    Camellia192 = 12,
    /// [Camellia](https://tools.ietf.org/html/rfc5581#section-3) with 256-bit key
    Camellia256 = 13,

    #[num_enum(catch_all)]
    Other(u8),
}

impl Default for SymmetricKeyAlgorithm {
    fn default() -> Self {
        Self::AES128
    }
}

impl zeroize::DefaultIsZeroes for SymmetricKeyAlgorithm {}

impl SymmetricKeyAlgorithm {
    /// All ciphers with an assigned id, in id order. `Plaintext` is not a cipher.
    pub const KNOWN: [SymmetricKeyAlgorithm; 11] = [
        SymmetricKeyAlgorithm::IDEA,
        SymmetricKeyAlgorithm::TripleDES,
        SymmetricKeyAlgorithm::CAST5,
        SymmetricKeyAlgorithm::Blowfish,
        SymmetricKeyAlgorithm::AES128,
        SymmetricKeyAlgorithm::AES192,
        SymmetricKeyAlgorithm::AES256,
        SymmetricKeyAlgorithm::Twofish,
        SymmetricKeyAlgorithm::Camellia128,
        SymmetricKeyAlgorithm::Camellia192,
        SymmetricKeyAlgorithm::Camellia256,
    ];

    /// The size of a single block in bytes.
    /// Based on <https://github.com/gpg/libgcrypt/blob/master/cipher>
    pub const fn block_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::Plaintext => 0,
            SymmetricKeyAlgorithm::IDEA => 8,
            SymmetricKeyAlgorithm::TripleDES => 8,
            SymmetricKeyAlgorithm::CAST5 => 8,
            SymmetricKeyAlgorithm::Blowfish => 8,
            SymmetricKeyAlgorithm::AES128 => 16,
            SymmetricKeyAlgorithm::AES192 => 16,
            SymmetricKeyAlgorithm::AES256 => 16,
            SymmetricKeyAlgorithm::Twofish => 16,
            SymmetricKeyAlgorithm::Camellia128 => 16,
            SymmetricKeyAlgorithm::Camellia192 => 16,
            SymmetricKeyAlgorithm::Camellia256 => 16,
            SymmetricKeyAlgorithm::Other(_) => 0,
        }
    }

    /// The size of the key in bytes.
    pub const fn key_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::Plaintext => 0,
            SymmetricKeyAlgorithm::IDEA => 16,
            SymmetricKeyAlgorithm::TripleDES => 24,
            SymmetricKeyAlgorithm::CAST5 => 16,
            SymmetricKeyAlgorithm::Blowfish => 16,
            SymmetricKeyAlgorithm::AES128 => 16,
            SymmetricKeyAlgorithm::AES192 => 24,
            SymmetricKeyAlgorithm::AES256 => 32,
            SymmetricKeyAlgorithm::Twofish => 32,
            SymmetricKeyAlgorithm::Camellia128 => 16,
            SymmetricKeyAlgorithm::Camellia192 => 24,
            SymmetricKeyAlgorithm::Camellia256 => 32,
            SymmetricKeyAlgorithm::Other(_) => 0,
        }
    }

    /// Reports whether an implementation of this cipher is linked in.
    pub const fn is_available(self) -> bool {
        match self {
            SymmetricKeyAlgorithm::Plaintext | SymmetricKeyAlgorithm::Other(_) => false,
            SymmetricKeyAlgorithm::IDEA => cfg!(feature = "idea"),
            _ => true,
        }
    }

    /// Decrypt the data using CFB mode, without padding. Overwrites the input.
    /// This is regular CFB, not OpenPGP CFB.
    pub fn decrypt_with_iv_regular(self, key: &[u8], iv: &[u8], ciphertext: &mut [u8]) -> Result<()> {
        debug!("cfb decrypt {:?}", self);

        match self {
            SymmetricKeyAlgorithm::Plaintext => {
                unsupported_err!("'Plaintext' is not a legal cipher for encrypted data")
            }
            #[cfg(feature = "idea")]
            SymmetricKeyAlgorithm::IDEA => decrypt_cfb::<idea::Idea>(key, iv, ciphertext),
            #[cfg(not(feature = "idea"))]
            SymmetricKeyAlgorithm::IDEA => {
                unsupported_err!("IDEA is not available in this build")
            }
            SymmetricKeyAlgorithm::TripleDES => decrypt_cfb::<TdesEde3>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::CAST5 => decrypt_cfb::<Cast5>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::Blowfish => decrypt_cfb::<Blowfish>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::AES128 => decrypt_cfb::<Aes128>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::AES192 => decrypt_cfb::<Aes192>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::AES256 => decrypt_cfb::<Aes256>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::Twofish => decrypt_cfb::<Twofish>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::Camellia128 => decrypt_cfb::<Camellia128>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::Camellia192 => decrypt_cfb::<Camellia192>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::Camellia256 => decrypt_cfb::<Camellia256>(key, iv, ciphertext),
            SymmetricKeyAlgorithm::Other(id) => {
                unsupported_err!("SymmetricKeyAlgorithm {} is unsupported", id)
            }
        }
    }

    /// Encrypt the data using CFB mode, without padding. Overwrites the input.
    /// This is regular CFB, not OpenPGP CFB.
    pub fn encrypt_with_iv_regular(self, key: &[u8], iv: &[u8], plaintext: &mut [u8]) -> Result<()> {
        debug!("cfb encrypt {:?}", self);

        match self {
            SymmetricKeyAlgorithm::Plaintext => {
                unsupported_err!("'Plaintext' is not a legal cipher for encrypted data")
            }
            #[cfg(feature = "idea")]
            SymmetricKeyAlgorithm::IDEA => encrypt_cfb::<idea::Idea>(key, iv, plaintext),
            #[cfg(not(feature = "idea"))]
            SymmetricKeyAlgorithm::IDEA => {
                unsupported_err!("IDEA is not available in this build")
            }
            SymmetricKeyAlgorithm::TripleDES => encrypt_cfb::<TdesEde3>(key, iv, plaintext),
            SymmetricKeyAlgorithm::CAST5 => encrypt_cfb::<Cast5>(key, iv, plaintext),
            SymmetricKeyAlgorithm::Blowfish => encrypt_cfb::<Blowfish>(key, iv, plaintext),
            SymmetricKeyAlgorithm::AES128 => encrypt_cfb::<Aes128>(key, iv, plaintext),
            SymmetricKeyAlgorithm::AES192 => encrypt_cfb::<Aes192>(key, iv, plaintext),
            SymmetricKeyAlgorithm::AES256 => encrypt_cfb::<Aes256>(key, iv, plaintext),
            SymmetricKeyAlgorithm::Twofish => encrypt_cfb::<Twofish>(key, iv, plaintext),
            SymmetricKeyAlgorithm::Camellia128 => encrypt_cfb::<Camellia128>(key, iv, plaintext),
            SymmetricKeyAlgorithm::Camellia192 => encrypt_cfb::<Camellia192>(key, iv, plaintext),
            SymmetricKeyAlgorithm::Camellia256 => encrypt_cfb::<Camellia256>(key, iv, plaintext),
            SymmetricKeyAlgorithm::Other(id) => {
                unsupported_err!("SymmetricKeyAlgorithm {} is unsupported", id)
            }
        }
    }
}
