use crate::codec::{
    CallHeader, CodecError, Decodable, Encodable, blob_len, decode_blob, decode_optional,
    decode_string, decode_token, encode_blob, encode_optional, encode_string, encode_token,
    optional_len, string_len, token_len,
};
use crate::datatypes::{CallId, CompletionTokens};
use bytes::{Bytes, BytesMut};
use std::io::Cursor;

/// Asks the transport service to send an already-encoded message.
///
/// The payload is carried byte for byte; nothing in this crate parses it.
/// Up to three completion tokens travel with the request so the service can
/// report sent, delivered and read outcomes back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct SendMessage {
    /// The message encoded in standard MMS PDU format
    pub payload: Bytes,
    /// Location URL associated with the message, if any
    pub location_url: Option<String>,
    pub tokens: CompletionTokens,
}

impl SendMessage {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            location_url: None,
            tokens: CompletionTokens::default(),
        }
    }

    pub fn with_location_url(mut self, location_url: impl Into<String>) -> Self {
        self.location_url = Some(location_url.into());
        self
    }

    pub fn with_tokens(mut self, tokens: CompletionTokens) -> Self {
        self.tokens = tokens;
        self
    }
}

impl Decodable for SendMessage {
    fn call_id() -> CallId {
        CallId::SendMessage
    }

    fn decode(header: CallHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let payload = decode_blob(buf)?;
        if payload.is_empty() {
            return Err(CodecError::FieldValidation {
                field: "payload",
                reason: "payload must not be empty".to_string(),
            });
        }

        let location_url = decode_optional(buf, "location_url", |buf| {
            decode_string(buf, "location_url")
        })?;
        let sent = decode_optional(buf, "sent_token", decode_token)?;
        let delivery = decode_optional(buf, "delivery_token", decode_token)?;
        let read = decode_optional(buf, "read_token", decode_token)?;

        Ok(SendMessage {
            payload,
            location_url,
            tokens: CompletionTokens {
                sent,
                delivery,
                read,
            },
        })
    }
}

impl Encodable for SendMessage {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        // frame_length is patched in by to_bytes
        let header = CallHeader {
            frame_length: 0,
            call_id: CallId::SendMessage,
        };
        header.encode(buf);

        encode_blob(buf, &self.payload, "payload")?;
        encode_optional(buf, self.location_url.as_deref(), |buf, value| {
            encode_string(buf, value, "location_url")
        })?;
        encode_optional(buf, self.tokens.sent.as_ref(), |buf, token| {
            encode_token(buf, token, "sent_token")
        })?;
        encode_optional(buf, self.tokens.delivery.as_ref(), |buf, token| {
            encode_token(buf, token, "delivery_token")
        })?;
        encode_optional(buf, self.tokens.read.as_ref(), |buf, token| {
            encode_token(buf, token, "read_token")
        })?;

        Ok(())
    }

    fn encoded_len(&self) -> Result<usize, CodecError> {
        let tokens = optional_len(self.tokens.sent.as_ref(), |t| token_len(t, "sent_token"))?
            + optional_len(self.tokens.delivery.as_ref(), |t| token_len(t, "delivery_token"))?
            + optional_len(self.tokens.read.as_ref(), |t| token_len(t, "read_token"))?;

        Ok(CallHeader::SIZE
            + blob_len(&self.payload, "payload")?
            + optional_len(self.location_url.as_deref(), |v| string_len(v, "location_url"))?
            + tokens)
    }
}
