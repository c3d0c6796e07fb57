use std::io;

use bytes::Buf;
use log::debug;

use crate::errors::{bail, unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag};

/// Represents a packet header.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-4.2>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    version: PacketHeaderVersion,
    tag: Tag,
    length: PacketLength,
}

impl PacketHeader {
    /// Parse a single packet header from the given buffer.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let header = i.read_u8()?;

        let header = match header & 0b1100_0000 {
            0b1100_0000 => {
                // new starts with 0b11
                let tag = Tag::from(header & 0b0011_1111);
                let olen = i.read_u8()?;
                let length = match olen {
                    // One-Octet Lengths
                    0..=191 => PacketLength::Fixed(olen.into()),
                    // Two-Octet Lengths
                    192..=223 => {
                        let a = i.read_u8()?;
                        let l = ((u32::from(olen) - 192) << 8) + 192 + u32::from(a);
                        PacketLength::Fixed(l)
                    }
                    // Partial Body Lengths
                    224..=254 => PacketLength::Partial(1 << (olen & 0x1F)),
                    // Five-Octet Lengths
                    255 => PacketLength::Fixed(i.read_be_u32()?),
                };
                PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                }
            }
            0b1000_0000 => {
                // old starts with 0b10
                let tag = Tag::from((header >> 2) & 0b0000_1111);
                let length = match header & 0b0000_0011 {
                    // One-Octet Lengths
                    0 => PacketLength::Fixed(i.read_u8()?.into()),
                    // Two-Octet Lengths
                    1 => PacketLength::Fixed(i.read_be_u16()?.into()),
                    // Four-Octet Lengths
                    2 => PacketLength::Fixed(i.read_be_u32()?),
                    3 => PacketLength::Indeterminate,
                    _ => unreachable!("old packet length type is only 2 bits"),
                };
                PacketHeader {
                    version: PacketHeaderVersion::Old,
                    tag,
                    length,
                }
            }
            _ => {
                bail!("unknown packet header version {:b}", header);
            }
        };
        debug!("packet header {:?}", header);

        Ok(header)
    }

    /// A new format header for a body of `len` bytes.
    pub fn new_fixed(tag: Tag, len: usize) -> Result<Self> {
        Ok(PacketHeader {
            version: PacketHeaderVersion::New,
            tag,
            length: PacketLength::Fixed(len.try_into()?),
        })
    }

    pub fn version(&self) -> PacketHeaderVersion {
        self.version
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn packet_length(&self) -> PacketLength {
        self.length
    }

    /// Splits the body of this packet off the front of `i`.
    ///
    /// Indeterminate lengths take everything that is left.
    pub fn take_body<B: Buf>(&self, mut i: B) -> Result<bytes::Bytes> {
        match self.length {
            PacketLength::Fixed(len) => Ok(i.read_take(len.try_into()?)?),
            PacketLength::Indeterminate => Ok(i.rest()),
            PacketLength::Partial(_) => unsupported_err!("partial body lengths"),
        }
    }
}

impl Serialize for PacketHeader {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let PacketLength::Fixed(len) = self.length else {
            unsupported_err!("writing {:?} packet lengths", self.length);
        };
        self.version
            .write_header(writer, self.tag, len.try_into()?)
    }

    fn write_len(&self) -> usize {
        let len = self.length.maybe_len().unwrap_or_default();
        self.version.header_len(len as usize)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_new_format_lengths() {
        let h = PacketHeader::from_buf(&hex!("c5 64")[..]).unwrap();
        assert_eq!(h.tag(), Tag::SecretKey);
        assert_eq!(h.packet_length(), PacketLength::Fixed(100));

        let h = PacketHeader::from_buf(&hex!("c2 c06e")[..]).unwrap();
        assert_eq!(h.tag(), Tag::Signature);
        assert_eq!(h.packet_length(), PacketLength::Fixed(302));

        let h = PacketHeader::from_buf(&hex!("c7 ff0000324b")[..]).unwrap();
        assert_eq!(h.tag(), Tag::SecretSubkey);
        assert_eq!(h.packet_length(), PacketLength::Fixed(12875));

        let h = PacketHeader::from_buf(&hex!("cb e1")[..]).unwrap();
        assert_eq!(h.packet_length(), PacketLength::Partial(2));
        let err = h.take_body(&hex!("0102")[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_old_format_lengths() {
        let h = PacketHeader::from_buf(&hex!("95 0102")[..]).unwrap();
        assert_eq!(h.version(), PacketHeaderVersion::Old);
        assert_eq!(h.tag(), Tag::SecretKey);
        assert_eq!(h.packet_length(), PacketLength::Fixed(0x0102));

        let h = PacketHeader::from_buf(&hex!("9e 00000003")[..]).unwrap();
        assert_eq!(h.tag(), Tag::SecretSubkey);
        assert_eq!(h.packet_length(), PacketLength::Fixed(3));

        let h = PacketHeader::from_buf(&hex!("8b")[..]).unwrap();
        assert_eq!(h.tag(), Tag::Signature);
        assert_eq!(h.packet_length(), PacketLength::Indeterminate);
        assert_eq!(&h.take_body(&hex!("010203")[..]).unwrap()[..], &[1, 2, 3]);
    }

    #[test]
    fn test_bad_header() {
        let err = PacketHeader::from_buf(&hex!("45 00")[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);

        let h = PacketHeader::from_buf(&hex!("c5 05")[..]).unwrap();
        let err = h.take_body(&hex!("0102")[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_old_format_written_back() {
        for raw in [&hex!("88 19")[..], &hex!("95 0102")[..], &hex!("9e 00012345")[..]] {
            let h = PacketHeader::from_buf(raw).unwrap();
            assert_eq!(h.version(), PacketHeaderVersion::Old);

            let bytes = h.to_bytes().unwrap();
            assert_eq!(bytes, raw.to_vec());
            assert_eq!(bytes.len(), h.write_len());
        }

        // shortest length encoding on the way out
        let h = PacketHeader::from_buf(&hex!("9e 00000003")[..]).unwrap();
        assert_eq!(h.to_bytes().unwrap(), hex!("9c 03").to_vec());

        let h = PacketHeader::from_buf(&hex!("8b")[..]).unwrap();
        assert_eq!(h.to_bytes().unwrap_err().kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_roundtrip() {
        for len in [0usize, 191, 192, 8383, 8384, 100_000] {
            let h = PacketHeader::new_fixed(Tag::Signature, len).unwrap();
            let bytes = h.to_bytes().unwrap();
            assert_eq!(bytes.len(), h.write_len());
            assert_eq!(PacketHeader::from_buf(&bytes[..]).unwrap(), h);
        }
    }
}
