use bytes::Bytes;

/// Opaque, caller-owned handle the transport service uses to report an
/// outcome out-of-band.
///
/// The client never looks inside a token. It is moved through to the service
/// unchanged, so cloning a token before a call and comparing afterwards
/// observes the very same bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompletionToken(Bytes);

impl CompletionToken {
    /// Largest token the wire format can carry
    pub const MAX_LEN: usize = u16::MAX as usize;

    pub fn new(handle: impl Into<Bytes>) -> Self {
        Self(handle.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Bytes> for CompletionToken {
    fn from(handle: Bytes) -> Self {
        Self(handle)
    }
}

impl From<Vec<u8>> for CompletionToken {
    fn from(handle: Vec<u8>) -> Self {
        Self(handle.into())
    }
}

impl From<&'static str> for CompletionToken {
    fn from(handle: &'static str) -> Self {
        Self(Bytes::from_static(handle.as_bytes()))
    }
}

/// Completion tokens that may accompany a send request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionTokens {
    /// Fired when the message has been sent, or sending failed
    pub sent: Option<CompletionToken>,
    /// Fired when the message is delivered to the recipient
    pub delivery: Option<CompletionToken>,
    /// Fired when the message is read by the recipient
    pub read: Option<CompletionToken>,
}

impl CompletionTokens {
    /// No tokens; the caller will not hear about the outcome
    pub fn none() -> Self {
        Self::default()
    }

    /// Only a sent token
    pub fn sent(token: impl Into<CompletionToken>) -> Self {
        Self {
            sent: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_delivery(mut self, token: impl Into<CompletionToken>) -> Self {
        self.delivery = Some(token.into());
        self
    }

    pub fn with_read(mut self, token: impl Into<CompletionToken>) -> Self {
        self.read = Some(token.into());
        self
    }

    /// Number of tokens present
    pub fn count(&self) -> usize {
        [&self.sent, &self.delivery, &self.read]
            .iter()
            .filter(|token| token.is_some())
            .count()
    }
}
