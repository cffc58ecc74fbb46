//! Client-side facade for an out-of-process MMS transport service.
//!
//! Applications hand an already-encoded MMS message (or a location to
//! download one from) to [`MmsManager`]. The manager validates the request,
//! resolves the transport service by its well-known name, and forwards one
//! one-way call. Results come back later through the completion tokens the
//! caller supplied.
//!
//! # Examples
//!
//! ## Sending a message
//!
//! ```rust,no_run
//! use mms::{ClientBuilder, CompletionTokens};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = ClientBuilder::tcp("127.0.0.1:2949".parse()?);
//!
//!     let pdu = std::fs::read("outbox/0001.mms")?;
//!     let tokens = CompletionTokens::sent("sent:0001").with_delivery("delivered:0001");
//!
//!     manager.send_message(pdu, None, tokens).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Downloading a message announced by a WAP push
//!
//! ```rust,no_run
//! use mms::{CompletionToken, MmsManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Process-wide manager talking to the service at its default socket
//!     let manager = MmsManager::get_default();
//!
//!     manager
//!         .download_message(
//!             "http://mmsc.example.net/retrieve?id=0042",
//!             Some("T18a3c7e0"),
//!             Some(CompletionToken::from("downloaded:0042")),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;

#[cfg(test)]
mod tests;

// Re-export codec types for direct access
pub use codec::{CallHeader, CodecError, Decodable, Encodable, Frame};

// Re-export the main client API for easy access
pub use client::{
    ClientBuilder, CompletionToken, CompletionTokens, Dispatch, DropReason, Endpoint, MmsError,
    MmsManager, MmsResult, ServiceDirectory, ServiceLocator,
};
