//! # Cryptography module

pub mod checksum;
pub mod ecc_curve;
pub mod hash;
pub mod public_key;
pub mod registry;
pub mod rsa;
pub mod sym;
