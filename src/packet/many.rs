use bytes::Bytes;
use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::packet::{PacketHeader, SecretKey, SignatureV3};
use crate::types::{PacketLength, Tag};

/// The packets this crate knows how to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    SecretKey(SecretKey),
    SecretSubkey(SecretKey),
    Signature(SignatureV3),
}

impl Packet {
    pub fn tag(&self) -> Tag {
        match self {
            Packet::SecretKey(_) => Tag::SecretKey,
            Packet::SecretSubkey(_) => Tag::SecretSubkey,
            Packet::Signature(_) => Tag::Signature,
        }
    }
}

/// Iterates over the packets in a buffer.
///
/// A packet that can't be decoded is yielded as an error and parsing moves on
/// to the next one, as long as its header could be read. Framing errors end
/// the iteration.
#[derive(Debug)]
pub struct PacketParser {
    reader: Bytes,
    done: bool,
}

impl PacketParser {
    pub fn new(source: impl Into<Bytes>) -> Self {
        PacketParser {
            reader: source.into(),
            done: false,
        }
    }

    fn next_body(&mut self) -> Result<(PacketHeader, Bytes)> {
        let header = PacketHeader::from_buf(&mut self.reader)?;
        if header.packet_length() == PacketLength::Indeterminate {
            // Runs to the end of the input, nothing can follow.
            self.done = true;
        }
        let body = header.take_body(&mut self.reader)?;

        Ok((header, body))
    }
}

fn decode(tag: Tag, body: Bytes) -> Result<Packet> {
    match tag {
        Tag::SecretKey => SecretKey::from_buf(body).map(Packet::SecretKey),
        Tag::SecretSubkey => SecretKey::subkey_from_buf(body).map(Packet::SecretSubkey),
        Tag::Signature => SignatureV3::from_buf(body).map(Packet::Signature),
        _ => Err(Error::Unsupported {
            message: format!("packet {:?}", tag),
        }),
    }
}

impl Iterator for PacketParser {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.is_empty() {
            return None;
        }

        let (header, body) = match self.next_body() {
            Ok(res) => res,
            Err(err) => {
                debug!("stopping at framing error: {}", err);
                self.done = true;
                return Some(Err(err));
            }
        };

        let res = decode(header.tag(), body);
        if let Err(ref err) = res {
            warn!("skipping {:?} packet: {}", header.tag(), err);
        }

        Some(res)
    }
}
