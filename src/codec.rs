// MMS transport call codec - separates the wire format from the call models
//
// Every call crosses the process boundary as a single frame: an 8 byte
// header followed by the call body. Each call type implements the
// Encodable/Decodable traits rather than having all parsing logic in one
// monolithic frame parser.

use crate::datatypes::{CallId, CompletionToken, DownloadMessage, SendMessage};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Maximum allowed frame size. Large enough for any carrier-accepted MMS PDU.
pub const MAX_FRAME_SIZE: u32 = 2 * 1024 * 1024; // 2MB

/// Frame header (8 bytes, common to all calls)
#[derive(Debug, Clone, PartialEq)]
pub struct CallHeader {
    pub frame_length: u32,
    pub call_id: CallId,
}

impl CallHeader {
    pub const SIZE: usize = 8;

    /// Decode the frame header from buffer with validation
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let frame_length = buf.get_u32();
        let call_id_raw = buf.get_u32();
        let call_id =
            CallId::try_from(call_id_raw).map_err(|_| CodecError::InvalidCallId(call_id_raw))?;

        if frame_length < Self::SIZE as u32 || frame_length > MAX_FRAME_SIZE {
            return Err(CodecError::InvalidFrameLength {
                length: frame_length as usize,
                min: Self::SIZE,
                max: MAX_FRAME_SIZE as usize,
            });
        }

        Ok(CallHeader {
            frame_length,
            call_id,
        })
    }

    /// Encode the frame header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.frame_length);
        buf.put_u32(self.call_id as u32);
    }
}

/// Trait for calls that can be encoded to bytes
pub trait Encodable {
    /// Encode this call, header included, to the buffer
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Size of the encoded call, header included. Fails on any field that
    /// `encode` would reject, without encoding anything.
    fn encoded_len(&self) -> Result<usize, CodecError>;

    /// Check that the call fits in a single frame and return its length
    fn frame_len(&self) -> Result<usize, CodecError> {
        let length = self.encoded_len()?;
        if length < CallHeader::SIZE || length > MAX_FRAME_SIZE as usize {
            return Err(CodecError::InvalidFrameLength {
                length,
                min: CallHeader::SIZE,
                max: MAX_FRAME_SIZE as usize,
            });
        }
        Ok(length)
    }

    /// Encode into a fresh buffer, fix up the frame_length field and
    /// return the frozen bytes.
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let length = self.frame_len()?;
        let mut buf = BytesMut::with_capacity(length);
        self.encode(&mut buf)?;
        debug_assert_eq!(buf.len(), length);

        buf[0..4].copy_from_slice(&(length as u32).to_be_bytes());
        Ok(buf.freeze())
    }
}

/// Trait for calls that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode this call from the buffer positioned after the header
    fn decode(header: CallHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;

    /// Return the expected call_id for this call type
    fn call_id() -> CallId;

    /// Validate the header is appropriate for this call type
    fn validate_header(header: &CallHeader) -> Result<(), CodecError> {
        if header.call_id != Self::call_id() {
            return Err(CodecError::UnexpectedCallId {
                expected: Self::call_id(),
                actual: header.call_id,
            });
        }
        Ok(())
    }
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Incomplete frame: need more data")]
    Incomplete,

    #[error("Invalid call_id: {0:#x}")]
    InvalidCallId(u32),

    #[error("Invalid frame length: {length}, must be {min}-{max}")]
    InvalidFrameLength {
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("Unexpected call_id: expected {expected:?}, got {actual:?}")]
    UnexpectedCallId { expected: CallId, actual: CallId },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("{0:?} body is shorter than its declared fields")]
    Truncated(CallId),

    #[error("{call_id:?} frame has {remaining} unread trailing bytes")]
    TrailingBytes { call_id: CallId, remaining: usize },

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode a 32-bit big-endian integer
pub fn decode_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u32())
}

/// Decode a u32 length-prefixed byte blob
pub fn decode_blob(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    let len = decode_u32(buf)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Decode a u16 length-prefixed UTF-8 string
pub fn decode_string(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<String, CodecError> {
    let len = decode_u16(buf)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec()).map_err(|source| CodecError::Utf8Error { field, source })
}

/// Decode a u16 length-prefixed completion token
pub fn decode_token(buf: &mut Cursor<&[u8]>) -> Result<CompletionToken, CodecError> {
    let len = decode_u16(buf)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(CompletionToken::new(buf.copy_to_bytes(len)))
}

/// Decode a presence flag followed, when set, by a value
pub fn decode_optional<T>(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
    decode: impl FnOnce(&mut Cursor<&[u8]>) -> Result<T, CodecError>,
) -> Result<Option<T>, CodecError> {
    match decode_u8(buf)? {
        0 => Ok(None),
        1 => decode(buf).map(Some),
        other => Err(CodecError::FieldValidation {
            field,
            reason: format!("invalid presence flag {other:#04x}"),
        }),
    }
}

/// Encoded size of a u32 length-prefixed byte blob
pub fn blob_len(value: &[u8], field: &'static str) -> Result<usize, CodecError> {
    if value.len() > MAX_FRAME_SIZE as usize {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!("{} bytes exceeds the {MAX_FRAME_SIZE} byte frame limit", value.len()),
        });
    }
    Ok(4 + value.len())
}

/// Encoded size of a u16 length-prefixed UTF-8 string
pub fn string_len(value: &str, field: &'static str) -> Result<usize, CodecError> {
    if value.len() > u16::MAX as usize {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!("{} bytes exceeds the {} byte limit", value.len(), u16::MAX),
        });
    }
    Ok(2 + value.len())
}

/// Encoded size of a u16 length-prefixed completion token
pub fn token_len(token: &CompletionToken, field: &'static str) -> Result<usize, CodecError> {
    if token.len() > CompletionToken::MAX_LEN {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!(
                "{} bytes exceeds the {} byte token limit",
                token.len(),
                CompletionToken::MAX_LEN
            ),
        });
    }
    Ok(2 + token.len())
}

/// Encoded size of a presence flag followed, when present, by the value
pub fn optional_len<T: ?Sized>(
    value: Option<&T>,
    len: impl FnOnce(&T) -> Result<usize, CodecError>,
) -> Result<usize, CodecError> {
    match value {
        Some(value) => Ok(1 + len(value)?),
        None => Ok(1),
    }
}

/// Encode a u32 length-prefixed byte blob
pub fn encode_blob(
    buf: &mut BytesMut,
    value: &[u8],
    field: &'static str,
) -> Result<(), CodecError> {
    blob_len(value, field)?;
    buf.put_u32(value.len() as u32);
    buf.put_slice(value);
    Ok(())
}

/// Encode a u16 length-prefixed UTF-8 string
pub fn encode_string(
    buf: &mut BytesMut,
    value: &str,
    field: &'static str,
) -> Result<(), CodecError> {
    string_len(value, field)?;
    buf.put_u16(value.len() as u16);
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Encode a u16 length-prefixed completion token
pub fn encode_token(
    buf: &mut BytesMut,
    token: &CompletionToken,
    field: &'static str,
) -> Result<(), CodecError> {
    token_len(token, field)?;
    buf.put_u16(token.len() as u16);
    buf.put_slice(token.as_bytes());
    Ok(())
}

/// Encode a presence flag followed, when present, by the value
pub fn encode_optional<T: ?Sized>(
    buf: &mut BytesMut,
    value: Option<&T>,
    encode: impl FnOnce(&mut BytesMut, &T) -> Result<(), CodecError>,
) -> Result<(), CodecError> {
    match value {
        Some(value) => {
            buf.put_u8(1);
            encode(buf, value)
        }
        None => {
            buf.put_u8(0);
            Ok(())
        }
    }
}

/// A single transport service call as carried on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    SendMessage(Box<SendMessage>),
    DownloadMessage(DownloadMessage),
}

impl Frame {
    /// Get the call_id for this frame
    pub fn call_id(&self) -> CallId {
        match self {
            Frame::SendMessage(_) => CallId::SendMessage,
            Frame::DownloadMessage(_) => CallId::DownloadMessage,
        }
    }

    /// Check whether a complete frame can be parsed from `buf`.
    ///
    /// Returns the frame length on success. The cursor position is left
    /// where it was on entry.
    pub fn check(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
        let start = buf.position();
        let header = CallHeader::decode(buf)?;
        buf.set_position(start);

        let frame_length = header.frame_length as usize;
        if buf.remaining() < frame_length {
            return Err(CodecError::Incomplete);
        }

        Ok(frame_length)
    }

    /// Parse one frame and advance the cursor past it
    pub fn parse(buf: &mut Cursor<&[u8]>) -> Result<Frame, CodecError> {
        let frame_length = Frame::check(buf)?;

        let data: &[u8] = buf.get_ref();
        let start = buf.position() as usize;
        let mut frame_buf = Cursor::new(&data[start..start + frame_length]);

        let header = CallHeader::decode(&mut frame_buf)?;
        let call_id = header.call_id;

        let frame = match call_id {
            CallId::SendMessage => SendMessage::decode(header, &mut frame_buf)
                .map(|call| Frame::SendMessage(Box::new(call))),
            CallId::DownloadMessage => {
                DownloadMessage::decode(header, &mut frame_buf).map(Frame::DownloadMessage)
            }
        }
        .map_err(|e| match e {
            // The whole frame is buffered, so running short means the body lies
            CodecError::Incomplete => CodecError::Truncated(call_id),
            other => other,
        })?;

        if frame_buf.has_remaining() {
            return Err(CodecError::TrailingBytes {
                call_id,
                remaining: frame_buf.remaining(),
            });
        }

        buf.advance(frame_length);
        Ok(frame)
    }
}

impl Encodable for Frame {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            Frame::SendMessage(call) => call.encode(buf),
            Frame::DownloadMessage(call) => call.encode(buf),
        }
    }

    fn encoded_len(&self) -> Result<usize, CodecError> {
        match self {
            Frame::SendMessage(call) => call.encoded_len(),
            Frame::DownloadMessage(call) => call.encoded_len(),
        }
    }
}
