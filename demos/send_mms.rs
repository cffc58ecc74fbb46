// ABOUTME: Example application sending or downloading an MMS message through the transport service
// ABOUTME: Shows ClientBuilder wiring and how the silent-drop outcome surfaces to a caller

pub(crate) use argh::FromArgs;
use mms::client::{
    ClientBuilder, CompletionToken, CompletionTokens, Dispatch, MmsManager, ServiceDirectory,
};
use std::error::Error;
use std::net::SocketAddr;

/// Example application to hand an MMS message to the transport service
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the host or IP address of the transport service (default: 127.0.0.1)
    #[argh(option)]
    host: Option<String>,

    /// the TCP port of the transport service (default: 2949)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// unix socket of the transport service, used instead of host/port
    #[argh(option)]
    socket: Option<String>,

    /// file holding an encoded MMS PDU to send
    #[argh(option, short = 'f')]
    pdu_file: Option<String>,

    /// location URL to download from, or to attach to a send
    #[argh(option, short = 'l')]
    location_url: Option<String>,

    /// transaction id for a download
    #[argh(option, short = 't')]
    transaction_id: Option<String>,
}

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::TRACE
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let manager: MmsManager<ServiceDirectory> = match &cli_args.socket {
        #[cfg(unix)]
        Some(path) => ClientBuilder::unix(path),
        #[cfg(not(unix))]
        Some(_) => return Err("unix sockets are not supported on this platform".into()),
        None => {
            let host = cli_args.host.as_deref().unwrap_or("127.0.0.1");
            let port = cli_args.port.unwrap_or(mms::client::DEFAULT_TCP_PORT);
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            ClientBuilder::tcp(addr)
        }
    };

    let dispatch = match cli_args.pdu_file {
        Some(pdu_file) => {
            let pdu = std::fs::read(&pdu_file)?;
            println!("Sending {} bytes from {pdu_file}", pdu.len());
            manager
                .send_message(
                    pdu,
                    cli_args.location_url.as_deref(),
                    CompletionTokens::sent("send_mms:sent").with_delivery("send_mms:delivered"),
                )
                .await?
        }
        None => {
            let location_url = cli_args
                .location_url
                .ok_or("either --pdu-file or --location-url is required")?;
            println!("Downloading {location_url}");
            manager
                .download_message(
                    &location_url,
                    cli_args.transaction_id.as_deref(),
                    Some(CompletionToken::from("send_mms:downloaded")),
                )
                .await?
        }
    };

    match dispatch {
        Dispatch::Forwarded => println!("Handed to the transport service"),
        Dispatch::Dropped(reason) => println!("Dropped, completion tokens will not fire: {reason}"),
    }

    Ok(())
}
