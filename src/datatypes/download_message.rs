use crate::codec::{
    CallHeader, CodecError, Decodable, Encodable, decode_optional, decode_string, decode_token,
    encode_optional, encode_string, encode_token, optional_len, string_len, token_len,
};
use crate::datatypes::{CallId, CompletionToken};
use bytes::BytesMut;
use std::io::Cursor;

/// Asks the transport service to download a message from the carrier.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadMessage {
    /// Where the message can be fetched from, usually taken from the WAP push
    /// notification that announced it
    pub location_url: String,
    /// Transaction id from the same notification, if the caller has one
    pub transaction_id: Option<String>,
    /// Fired when the message is downloaded, or the download failed
    pub downloaded: Option<CompletionToken>,
}

impl DownloadMessage {
    pub fn new(location_url: impl Into<String>) -> Self {
        Self {
            location_url: location_url.into(),
            transaction_id: None,
            downloaded: None,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_downloaded(mut self, token: impl Into<CompletionToken>) -> Self {
        self.downloaded = Some(token.into());
        self
    }
}

impl Decodable for DownloadMessage {
    fn call_id() -> CallId {
        CallId::DownloadMessage
    }

    fn decode(header: CallHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let location_url = decode_string(buf, "location_url")?;
        if location_url.is_empty() {
            return Err(CodecError::FieldValidation {
                field: "location_url",
                reason: "location URL must not be empty".to_string(),
            });
        }

        let transaction_id = decode_optional(buf, "transaction_id", |buf| {
            decode_string(buf, "transaction_id")
        })?;
        let downloaded = decode_optional(buf, "downloaded_token", decode_token)?;

        Ok(DownloadMessage {
            location_url,
            transaction_id,
            downloaded,
        })
    }
}

impl Encodable for DownloadMessage {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let header = CallHeader {
            frame_length: 0,
            call_id: CallId::DownloadMessage,
        };
        header.encode(buf);

        encode_string(buf, &self.location_url, "location_url")?;
        encode_optional(buf, self.transaction_id.as_deref(), |buf, value| {
            encode_string(buf, value, "transaction_id")
        })?;
        encode_optional(buf, self.downloaded.as_ref(), |buf, token| {
            encode_token(buf, token, "downloaded_token")
        })?;

        Ok(())
    }

    fn encoded_len(&self) -> Result<usize, CodecError> {
        Ok(CallHeader::SIZE
            + string_len(&self.location_url, "location_url")?
            + optional_len(self.transaction_id.as_deref(), |v| {
                string_len(v, "transaction_id")
            })?
            + optional_len(self.downloaded.as_ref(), |t| token_len(t, "downloaded_token"))?)
    }
}
