use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;

/// Length of a packet body, as announced by its header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PacketLength {
    Fixed(u32),
    /// Old format only: the body extends to the end of the input.
    Indeterminate,
    /// New format partial body chunk.
    Partial(u32),
}

impl PacketLength {
    /// Returns the length in bytes, if it is specified.
    pub fn maybe_len(&self) -> Option<u32> {
        match self {
            Self::Fixed(len) | Self::Partial(len) => Some(*len),
            Self::Indeterminate => None,
        }
    }
}

/// Packet tag.
///
/// Only the tags this crate decodes are named, everything else ends up in `Other`.
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-4.3>
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Tag {
    /// Signature Packet
    Signature = 2,
    /// Secret-Key Packet
    SecretKey = 5,
    /// Public-Key Packet
    PublicKey = 6,
    /// Secret-Subkey Packet
    SecretSubkey = 7,
    /// Public-Subkey Packet
    PublicSubkey = 14,

    #[num_enum(catch_all)]
    Other(u8),
}

/// The two packet header formats.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PacketHeaderVersion {
    /// Old Packet Format
    Old,
    /// New Packet Format
    #[default]
    New,
}

impl PacketHeaderVersion {
    pub fn write_header(self, writer: &mut impl io::Write, tag: Tag, len: usize) -> Result<()> {
        debug!("write_header {:?} {:?} {}", self, tag, len);
        let tag: u8 = tag.into();
        match self {
            PacketHeaderVersion::Old => {
                if len < 256 {
                    writer.write_u8(0b1000_0000 | (tag << 2))?;
                    writer.write_u8(len.try_into()?)?;
                } else if len < 65536 {
                    writer.write_u8(0b1000_0001 | (tag << 2))?;
                    writer.write_u16::<BigEndian>(len.try_into()?)?;
                } else {
                    writer.write_u8(0b1000_0010 | (tag << 2))?;
                    writer.write_u32::<BigEndian>(len.try_into()?)?;
                }
            }
            PacketHeaderVersion::New => {
                writer.write_u8(0b1100_0000 | tag)?;
                if len < 192 {
                    writer.write_u8(len.try_into()?)?;
                } else if len < 8384 {
                    let len = len - 192;
                    writer.write_u8(((len >> 8) + 192).try_into()?)?;
                    writer.write_u8((len & 0xFF).try_into()?)?;
                } else {
                    writer.write_u8(255)?;
                    writer.write_u32::<BigEndian>(len.try_into()?)?;
                }
            }
        }

        Ok(())
    }

    /// Length of the header, in bytes.
    pub fn header_len(self, len: usize) -> usize {
        match self {
            PacketHeaderVersion::Old => {
                if len < 256 {
                    2
                } else if len < 65536 {
                    3
                } else {
                    5
                }
            }
            PacketHeaderVersion::New => {
                if len < 192 {
                    2
                } else if len < 8384 {
                    3
                } else {
                    6
                }
            }
        }
    }
}

/// Version of a key packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum KeyVersion {
    V2 = 2,
    V3 = 3,
    V4 = 4,

    #[num_enum(catch_all)]
    Other(u8),
}

impl KeyVersion {
    /// Size of the fingerprint in bytes
    /// (returns `None` for unknown versions)
    pub const fn fingerprint_len(&self) -> Option<usize> {
        match self {
            KeyVersion::V2 | KeyVersion::V3 => Some(16), // MD5
            KeyVersion::V4 => Some(20),                  // SHA1
            KeyVersion::Other(_) => None,
        }
    }

    /// v2 and v3 keys share one layout.
    pub const fn is_legacy(&self) -> bool {
        matches!(self, KeyVersion::V2 | KeyVersion::V3)
    }
}

impl Default for KeyVersion {
    fn default() -> Self {
        Self::V4
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_write_header() {
        let mut buf = Vec::new();
        PacketHeaderVersion::New
            .write_header(&mut buf, Tag::SecretKey, 12875)
            .unwrap();
        assert_eq!(hex::encode(buf), "c5ff0000324b");

        let mut buf = Vec::new();
        PacketHeaderVersion::New
            .write_header(&mut buf, Tag::Signature, 302)
            .unwrap();
        assert_eq!(hex::encode(buf), "c2c06e");

        let mut buf = Vec::new();
        PacketHeaderVersion::Old
            .write_header(&mut buf, Tag::SecretSubkey, 300)
            .unwrap();
        assert_eq!(hex::encode(buf), "9d012c");
    }

    #[test]
    fn test_tag_catch_all() {
        assert_eq!(Tag::from(5u8), Tag::SecretKey);
        assert_eq!(Tag::from(13u8), Tag::Other(13));
        assert_eq!(u8::from(Tag::Other(13)), 13);
        assert_eq!(KeyVersion::from(4u8), KeyVersion::V4);
        assert_eq!(KeyVersion::from(5u8), KeyVersion::Other(5));
    }

    fn header_version() -> impl Strategy<Value = PacketHeaderVersion> {
        prop_oneof![Just(PacketHeaderVersion::Old), Just(PacketHeaderVersion::New)]
    }

    proptest! {
        #[test]
        fn header_len(version in header_version(), len in 0usize..=u32::MAX as usize) {
            let mut buf = Vec::new();
            version.write_header(&mut buf, Tag::Signature, len).unwrap();
            prop_assert_eq!(buf.len(), version.header_len(len));
        }
    }
}
