// ABOUTME: Capability traits separating the MMS facade from how the transport service is reached
// ABOUTME: ServiceLocator resolves a name to a handle; MmsService issues the one-way calls

use crate::client::error::{CommunicationFault, ServiceUnavailable};
use crate::datatypes::{DownloadMessage, SendMessage};
use std::future::Future;

/// A live handle to the transport service
///
/// Each method issues exactly one one-way call and returns as soon as the
/// call has been handed off. Outcomes travel back through the completion
/// tokens inside the call, never through the return value.
///
/// The returned futures are `Send`, so a manager generic over its locator can
/// be driven from `tokio::spawn`. Implementations may still be written with
/// `async fn`.
pub trait MmsService {
    /// Forward a send request to the service
    fn send_message(
        &mut self,
        call: SendMessage,
    ) -> impl Future<Output = Result<(), CommunicationFault>> + Send;

    /// Forward a download request to the service
    fn download_message(
        &mut self,
        call: DownloadMessage,
    ) -> impl Future<Output = Result<(), CommunicationFault>> + Send;
}

/// Resolves a well-known service name to a handle
///
/// Resolution happens on every call; implementations should not assume the
/// handle outlives the call it was resolved for.
pub trait ServiceLocator {
    type Service: MmsService + Send;

    /// Resolve `name`, or explain why no handle is available
    fn resolve(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Self::Service, ServiceUnavailable>> + Send;
}
