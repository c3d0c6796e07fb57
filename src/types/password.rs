use zeroize::Zeroizing;

/// Passphrase used to unlock encrypted secret key material.
///
/// The bytes are wiped when the value is dropped.
#[derive(Clone, Default, derive_more::Debug)]
pub struct Password(#[debug("***")] Zeroizing<Vec<u8>>);

impl Password {
    /// The empty passphrase.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value.into_bytes().into())
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec().into())
    }
}

impl From<&[u8]> for Password {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec().into())
    }
}

impl From<Vec<u8>> for Password {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into())
    }
}
