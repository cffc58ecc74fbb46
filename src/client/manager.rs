// ABOUTME: MMS transport client facade validating arguments and forwarding calls to the service
// ABOUTME: Resolves the service on every call and silently drops calls that cannot reach it

use crate::client::directory::{SERVICE_NAME, ServiceDirectory};
use crate::client::error::{DropReason, MmsError, MmsResult};
use crate::client::traits::{MmsService, ServiceLocator};
use crate::codec::{CodecError, Encodable};
use crate::datatypes::{CompletionToken, CompletionTokens, DownloadMessage, SendMessage};
use bytes::Bytes;
use std::sync::OnceLock;
use tracing::{debug, error};

static DEFAULT_MANAGER: OnceLock<MmsManager<ServiceDirectory>> = OnceLock::new();

/// What happened to a well-formed call
///
/// Forwarding is fire-and-forget, so `Forwarded` only means the call was
/// handed to the transport service. A `Dropped` call had no effect at all:
/// the service never saw it and the caller's completion tokens will never
/// fire. Dropping is the client's policy for every downstream problem; it is
/// reported here rather than as an error so callers may ignore it.
#[derive(Debug)]
pub enum Dispatch {
    /// Exactly one call was issued to the transport service
    Forwarded,
    /// No call reached the transport service
    Dropped(DropReason),
}

impl Dispatch {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Dispatch::Forwarded)
    }

    /// Treat a dropped call as an error
    pub fn into_result(self) -> MmsResult<()> {
        match self {
            Dispatch::Forwarded => Ok(()),
            Dispatch::Dropped(reason) => Err(reason.into()),
        }
    }
}

/// Client-side facade for sending and downloading MMS messages
///
/// The manager owns no state beyond its locator and the name it resolves.
/// Each operation validates its arguments, resolves the transport service,
/// and issues one call that carries the caller's completion tokens. The
/// outcome of the actual transfer is reported later by the service through
/// those tokens.
///
/// Construct one with [`MmsManager::new`] and pass it to the code that needs
/// it, or use the process-wide [`MmsManager::get_default`].
#[derive(Debug)]
pub struct MmsManager<L> {
    locator: L,
    service_name: String,
}

impl<L: ServiceLocator> MmsManager<L> {
    /// Create a manager resolving [`SERVICE_NAME`] through `locator`
    pub fn new(locator: L) -> Self {
        Self::with_service_name(locator, SERVICE_NAME)
    }

    /// Create a manager resolving `service_name` through `locator`
    pub fn with_service_name(locator: L, service_name: impl Into<String>) -> Self {
        Self {
            locator,
            service_name: service_name.into(),
        }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Send an MMS message
    ///
    /// `payload` is the message encoded in standard MMS PDU format and must
    /// not be empty. Each token in `tokens` that is present is handed to the
    /// service: `sent` fires when the message is sent or sending failed,
    /// `delivery` when it reaches the recipient, `read` when the recipient
    /// reads it.
    ///
    /// Returns `Err(MmsError::InvalidArgument)` for an empty payload, before
    /// anything else happens. Every other outcome is `Ok`. A call too large
    /// for one frame is dropped as a communication fault without resolving
    /// the service.
    pub async fn send_message(
        &self,
        payload: impl Into<Bytes>,
        location_url: Option<&str>,
        tokens: CompletionTokens,
    ) -> MmsResult<Dispatch> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(MmsError::InvalidArgument(
                "Empty or zero length PDU".to_string(),
            ));
        }

        let call = SendMessage {
            payload,
            location_url: location_url.map(str::to_owned),
            tokens,
        };
        if let Err(e) = call.frame_len() {
            return Ok(self.unframeable("send_message", e));
        }

        let mut service = match self.resolve().await {
            Ok(service) => service,
            Err(reason) => return Ok(Dispatch::Dropped(reason)),
        };

        let len = call.payload.len();
        match service.send_message(call).await {
            Ok(()) => {
                debug!(service = %self.service_name, payload_len = len, "send_message forwarded");
                Ok(Dispatch::Forwarded)
            }
            Err(fault) => {
                debug!(service = %self.service_name, error = %fault, "send_message dropped");
                Ok(Dispatch::Dropped(fault.into()))
            }
        }
    }

    /// Download an MMS message from the carrier
    ///
    /// `location_url` is where the message is stored, usually taken from the
    /// WAP push notification, and must not be empty. `transaction_id` comes
    /// from the same notification when available. `downloaded`, if present,
    /// fires when the message is downloaded or the download failed.
    ///
    /// Returns `Err(MmsError::InvalidArgument)` for an empty location URL.
    /// Every other outcome is `Ok`.
    pub async fn download_message(
        &self,
        location_url: &str,
        transaction_id: Option<&str>,
        downloaded: Option<CompletionToken>,
    ) -> MmsResult<Dispatch> {
        if location_url.is_empty() {
            return Err(MmsError::InvalidArgument(
                "Empty MMS location URL".to_string(),
            ));
        }

        let call = DownloadMessage {
            location_url: location_url.to_owned(),
            transaction_id: transaction_id.map(str::to_owned),
            downloaded,
        };
        if let Err(e) = call.frame_len() {
            return Ok(self.unframeable("download_message", e));
        }

        let mut service = match self.resolve().await {
            Ok(service) => service,
            Err(reason) => return Ok(Dispatch::Dropped(reason)),
        };

        match service.download_message(call).await {
            Ok(()) => {
                debug!(service = %self.service_name, location_url, "download_message forwarded");
                Ok(Dispatch::Forwarded)
            }
            Err(fault) => {
                debug!(service = %self.service_name, error = %fault, "download_message dropped");
                Ok(Dispatch::Dropped(fault.into()))
            }
        }
    }

    // A call that cannot be framed is dropped before any connection is made
    fn unframeable(&self, operation: &'static str, error: CodecError) -> Dispatch {
        debug!(service = %self.service_name, operation, error = %error, "call dropped");
        Dispatch::Dropped(DropReason::CommunicationFault(error.into()))
    }

    async fn resolve(&self) -> Result<L::Service, DropReason> {
        self.locator
            .resolve(&self.service_name)
            .await
            .map_err(|e| {
                error!(service = %self.service_name, error = %e, "Can not find MMS service");
                DropReason::from(e)
            })
    }
}

impl MmsManager<ServiceDirectory> {
    /// The process-wide manager, backed by [`ServiceDirectory::with_defaults`]
    ///
    /// Built on first use; every call returns the same instance.
    pub fn get_default() -> &'static MmsManager<ServiceDirectory> {
        DEFAULT_MANAGER.get_or_init(|| MmsManager::new(ServiceDirectory::with_defaults()))
    }
}
