use std::io;

use sha1::{Digest, Sha1};

use crate::errors::{bail, Result, CHECKSUM_FAILURE};

const SHA1_LEN: usize = 20;

/// Two octet checksum: sum of all octets mod 65536.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimpleChecksum(u16);

impl SimpleChecksum {
    pub fn update(&mut self, data: &[u8]) {
        for byte in data {
            self.0 = self.0.wrapping_add(u16::from(*byte));
        }
    }

    pub fn finalize(&self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub fn to_writer<W: io::Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.finalize())?;
        Ok(())
    }
}

impl io::Write for SimpleChecksum {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[inline]
pub fn calculate_simple(data: &[u8]) -> u16 {
    let mut hasher = SimpleChecksum::default();
    hasher.update(data);
    hasher.0
}

#[inline]
pub fn calculate_sha1<I, T>(data: I) -> [u8; SHA1_LEN]
where
    T: AsRef<[u8]>,
    I: IntoIterator<Item = T>,
{
    let mut digest = Sha1::new();
    for chunk in data {
        digest.update(chunk.as_ref());
    }
    digest.finalize().into()
}

/// Checks the trailing two octet sum of `data` and returns the protected part.
pub fn strip_simple(data: &[u8]) -> Result<&[u8]> {
    if data.len() < 2 {
        bail!(CHECKSUM_FAILURE);
    }
    let (body, trailer) = data.split_at(data.len() - 2);
    if calculate_simple(body).to_be_bytes() != trailer {
        bail!(CHECKSUM_FAILURE);
    }

    Ok(body)
}

/// Checks the trailing SHA-1 digest of `data` and returns the protected part.
pub fn strip_sha1(data: &[u8]) -> Result<&[u8]> {
    if data.len() < SHA1_LEN {
        bail!(CHECKSUM_FAILURE);
    }
    let (body, trailer) = data.split_at(data.len() - SHA1_LEN);
    if calculate_sha1([body]) != trailer {
        bail!(CHECKSUM_FAILURE);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_simple_wraps() {
        let data = vec![0xFFu8; 300];
        assert_eq!(calculate_simple(&data), ((300u32 * 0xFF) % 65536) as u16);
        assert_eq!(calculate_simple(&[]), 0);
    }

    #[test]
    fn test_strip_simple() {
        assert_eq!(strip_simple(&[1, 2, 3, 0x00, 0x06]).unwrap(), &[1u8, 2, 3]);
        assert!(strip_simple(&[1, 2, 3, 0x00, 0x07])
            .unwrap_err()
            .is_checksum_failure());
        assert!(strip_simple(&[0x00]).is_err());
        assert_eq!(strip_simple(&[0x00, 0x00]).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_strip_sha1() {
        let mut data = b"abc".to_vec();
        // SHA1("abc")
        data.extend_from_slice(&hex_literal::hex!(
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        ));
        assert_eq!(strip_sha1(&data).unwrap(), b"abc");

        data[0] ^= 1;
        assert!(strip_sha1(&data).unwrap_err().is_checksum_failure());
        assert!(strip_sha1(&[0u8; 19]).is_err());
    }

    proptest! {
        #[test]
        fn simple_checksum_writer_matches(data: Vec<u8>) {
            let mut hasher = SimpleChecksum::default();
            io::Write::write_all(&mut hasher, &data).unwrap();
            prop_assert_eq!(hasher.finalize(), calculate_simple(&data).to_be_bytes());

            let mut framed = data.clone();
            framed.extend_from_slice(&hasher.finalize());
            prop_assert_eq!(strip_simple(&framed).unwrap(), &data[..]);
        }
    }
}
