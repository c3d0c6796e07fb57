//! # Packet module
//!
//! Decoding and encoding of the individual packets: secret keys and subkeys,
//! their public portion, and version 2/3 signatures.

mod header;
mod many;
mod public_key;
mod secret_key;
mod signature_v3;

pub use self::{
    header::PacketHeader,
    many::{Packet, PacketParser},
    public_key::PublicKey,
    secret_key::SecretKey,
    signature_v3::{SignatureBytes, SignatureType, SignatureV3, SignatureVersion},
};
