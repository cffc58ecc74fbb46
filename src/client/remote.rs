// ABOUTME: Default MmsService implementation writing one frame per call over a socket
// ABOUTME: Fire-and-forget: the frame is flushed and the write half closed, no reply is read

use crate::client::error::CommunicationFault;
use crate::client::traits::MmsService;
use crate::codec::Frame;
use crate::connection::Connection;
use crate::datatypes::{DownloadMessage, SendMessage};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

/// Handle to a transport service reached over a byte stream
///
/// Each handle carries exactly one call. The frame is written, flushed and
/// the stream's write half is shut down so the service sees a clean end of
/// stream after the call.
pub struct RemoteService<S> {
    connection: Connection<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> RemoteService<S> {
    pub fn new(stream: S) -> Self {
        Self {
            connection: Connection::new(stream),
        }
    }

    async fn forward(&mut self, frame: Frame) -> Result<(), CommunicationFault> {
        trace!(call_id = ?frame.call_id(), "writing call frame");
        self.connection.write_frame(&frame).await?;
        self.connection.shutdown().await?;
        Ok(())
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send> MmsService for RemoteService<S> {
    async fn send_message(&mut self, call: SendMessage) -> Result<(), CommunicationFault> {
        self.forward(Frame::SendMessage(Box::new(call))).await
    }

    async fn download_message(&mut self, call: DownloadMessage) -> Result<(), CommunicationFault> {
        self.forward(Frame::DownloadMessage(call)).await
    }
}
