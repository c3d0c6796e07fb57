//! # pgp-keycodec
//!
//! Decoding and encoding of OpenPGP secret key packets and legacy (version 2
//! and 3) signature packets, as described in [RFC 4880].
//!
//! Secret keys are usually protected with a passphrase. They are parsed in
//! their encrypted form and can be unlocked later:
//!
//! ```no_run
//! use pgp_keycodec::{Password, SecretKey};
//!
//! # fn run(body: &[u8]) -> pgp_keycodec::errors::Result<()> {
//! let key = SecretKey::from_slice(body)?;
//! let unlocked = key.unlock(&Password::from("testing"))?;
//! assert!(!unlocked.is_encrypted());
//! # Ok(())
//! # }
//! ```
//!
//! [RFC 4880]: https://www.rfc-editor.org/rfc/rfc4880.html

#![deny(unsafe_code)]

pub mod crypto;
pub mod errors;
pub mod packet;
pub mod parsing;
pub mod ser;
pub mod types;
mod util;

pub use self::crypto::registry::{intersect_preserve_order, registry, Registry};
pub use self::packet::{Packet, PacketParser, SecretKey, SignatureV3};
pub use self::types::Password;
