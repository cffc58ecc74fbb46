// ABOUTME: MMS client module: the transport client facade and the seams it is built on
// ABOUTME: Exports the manager, locator and service traits, the directory, builder and errors

//! MMS Client Module
//!
//! A thin facade that forwards send and download requests for encoded MMS
//! messages to a transport service running in another process.
//!
//! * **Validate, resolve, forward** - arguments are checked up front, the
//!   service is resolved by name on every call, and exactly one one-way call
//!   is issued
//! * **Completion tokens** - outcomes come back out-of-band through tokens the
//!   caller supplies; the client never inspects them
//! * **Silent drop** - an unreachable service or a failed call is logged and
//!   reported as [`Dispatch::Dropped`], never as an error
//! * **Pluggable transport** - [`ServiceLocator`] and [`MmsService`] decouple
//!   the facade from how the service is reached
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mms::client::{ClientBuilder, CompletionTokens};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ClientBuilder::tcp("127.0.0.1:2949".parse()?);
//!
//! let pdu = std::fs::read("message.mms")?;
//! let dispatch = manager
//!     .send_message(pdu, None, CompletionTokens::sent("sent:42"))
//!     .await?;
//!
//! if !dispatch.is_forwarded() {
//!     // The service was unreachable; the sent token will never fire
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! * `MmsManager` - the facade (send_message, download_message)
//! * `ServiceLocator` - resolves a service name to a handle
//! * `MmsService` - issues the one-way calls on a resolved handle
//! * `ServiceDirectory` - default locator mapping names to socket endpoints
//! * `RemoteService` - default handle writing one frame per call

pub mod builder;
pub mod directory;
pub mod error;
pub mod manager;
pub mod remote;
pub mod traits;

pub use builder::ClientBuilder;
pub use directory::{Endpoint, SERVICE_NAME, ServiceDirectory, Transport};
#[cfg(unix)]
pub use directory::DEFAULT_SOCKET_PATH;
pub use directory::DEFAULT_TCP_PORT;
pub use error::{CommunicationFault, DropReason, MmsError, MmsResult, ServiceUnavailable};
pub use manager::{Dispatch, MmsManager};
pub use remote::RemoteService;
pub use traits::{MmsService, ServiceLocator};

pub use crate::datatypes::{CompletionToken, CompletionTokens};
