// ABOUTME: Frame-based I/O over any async byte stream for transport service calls
// ABOUTME: Buffers reads until a whole frame is present and writes frames through a BufWriter

use crate::codec::{CodecError, Encodable, Frame};
use bytes::{Buf, BytesMut};
use std::io::{self, Cursor};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

/// Frame-level connection to (or from) a transport service.
///
/// The stream is usually a `TcpStream` or `UnixStream`, but anything that
/// implements `AsyncRead + AsyncWrite` works, which keeps in-memory pipes
/// usable in tests.
///
/// The client side of a call is one-way: a single frame is written, flushed,
/// and the write half is shut down. Nothing is read back. `read_frame` exists
/// for the receiving end of the stream.
#[derive(Debug)]
pub struct Connection<S> {
    // Writes go through a `BufWriter` so a frame leaves in as few syscalls
    // as possible.
    stream: BufWriter<S>,

    // The buffer for reading frames.
    buffer: BytesMut,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Create a new `Connection` backed by `stream`.
    pub fn new(stream: S) -> Connection<S> {
        Connection {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Read a single `Frame` from the underlying stream.
    ///
    /// Waits until enough data has been buffered to parse a frame. Any data
    /// left over after the frame is kept for the next call.
    ///
    /// # Returns
    ///
    /// On success, the received frame is returned. If the stream is closed
    /// on a frame boundary, `None` is returned. Closing in the middle of a
    /// frame is an error.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, CodecError> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates end of stream.
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                } else {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream closed in the middle of a frame",
                    )
                    .into());
                }
            }
        }
    }

    /// Try to parse a frame from the buffer. Returns `None` when more data
    /// is needed.
    fn parse_frame(&mut self) -> Result<Option<Frame>, CodecError> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match Frame::check(&mut buf) {
            Ok(len) => {
                let frame = Frame::parse(&mut buf)?;

                // Discard the parsed data from the read buffer.
                self.buffer.advance(len);
                Ok(Some(frame))
            }
            // Not an error: wait for the rest of the frame.
            Err(CodecError::Incomplete) => Ok(None),
            // The stream is now in an invalid state and should be dropped.
            Err(e) => Err(e),
        }
    }

    /// Write a single `Frame` to the underlying stream and flush it.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), CodecError> {
        let bytes = frame.to_bytes()?;
        self.stream.write_all(&bytes).await?;

        // Push whatever is still sitting in the BufWriter out to the stream.
        self.stream.flush().await?;
        Ok(())
    }

    /// Flush and shut down the write half of the stream.
    pub async fn shutdown(&mut self) -> Result<(), CodecError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
