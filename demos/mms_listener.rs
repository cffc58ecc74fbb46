// ABOUTME: Minimal stand-in for the transport service that prints every call it receives
// ABOUTME: Useful next to send_mms for watching the frames the client writes

use argh::FromArgs;
use mms::Frame;
use mms::connection::Connection;
use std::error::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Listen for MMS client calls and print them
#[derive(FromArgs)]
struct CliArgs {
    /// address to listen on (default: 127.0.0.1:2949)
    #[argh(option, short = 'a')]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();
    tracing_subscriber::fmt::init();

    let addr = cli_args
        .addr
        .unwrap_or_else(|| format!("127.0.0.1:{}", mms::client::DEFAULT_TCP_PORT));
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    loop {
        let (socket, peer) = listener.accept().await?;
        tokio::spawn(async move {
            let mut connection = Connection::new(socket);
            loop {
                match connection.read_frame().await {
                    Ok(Some(Frame::SendMessage(call))) => info!(
                        %peer,
                        payload_len = call.payload.len(),
                        location_url = ?call.location_url,
                        tokens = call.tokens.count(),
                        "send_message"
                    ),
                    Ok(Some(Frame::DownloadMessage(call))) => info!(
                        %peer,
                        location_url = %call.location_url,
                        transaction_id = ?call.transaction_id,
                        has_token = call.downloaded.is_some(),
                        "download_message"
                    ),
                    Ok(None) => break,
                    Err(e) => {
                        warn!(%peer, "Dropping connection: {e}");
                        break;
                    }
                }
            }
        });
    }
}
