// ABOUTME: MMS client error types covering argument validation and the two silent-drop causes
// ABOUTME: Provides structured error reporting with automatic conversion from I/O and codec errors

use crate::codec::CodecError;
use std::io;
use thiserror::Error;

/// Error type for MMS client operations
///
/// The facade only ever returns `InvalidArgument` from its operations. The
/// other two variants describe why a call was dropped and are available
/// through [`Dispatch::into_result`](crate::client::Dispatch::into_result)
/// for callers that want to treat a drop as a failure.
#[derive(Debug, Error)]
pub enum MmsError {
    /// Caller-supplied argument rejected before any remote interaction
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The named transport service could not be resolved
    #[error(transparent)]
    ServiceUnavailable(#[from] ServiceUnavailable),

    /// The call to the transport service failed mid-flight
    #[error(transparent)]
    CommunicationFault(#[from] CommunicationFault),
}

/// Result type alias for MMS client operations
pub type MmsResult<T> = Result<T, MmsError>;

/// The transport service name did not resolve to a live handle
#[derive(Debug, Error)]
pub enum ServiceUnavailable {
    /// Nothing is registered under the name
    #[error("Service '{name}' is not registered")]
    NotRegistered { name: String },

    /// The name is registered but its endpoint could not be reached
    #[error("Service '{name}' at {endpoint} is unreachable: {source}")]
    Unreachable {
        name: String,
        endpoint: String,
        #[source]
        source: io::Error,
    },
}

/// The downstream call primitive failed after the service was resolved
#[derive(Debug, Error)]
pub enum CommunicationFault {
    /// I/O error while writing the call to the service
    #[error("Transport I/O error: {0}")]
    Io(#[from] io::Error),

    /// The call could not be put on the wire
    #[error("Call could not be encoded: {0}")]
    Codec(CodecError),
}

impl From<CodecError> for CommunicationFault {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(io_err) => CommunicationFault::Io(io_err),
            other => CommunicationFault::Codec(other),
        }
    }
}

/// Why a call was dropped without reaching the transport service
#[derive(Debug, Error)]
pub enum DropReason {
    /// The service could not be resolved, so no call was attempted
    #[error(transparent)]
    ServiceUnavailable(#[from] ServiceUnavailable),

    /// The call could not be framed or its delivery failed
    #[error(transparent)]
    CommunicationFault(#[from] CommunicationFault),
}

impl From<DropReason> for MmsError {
    fn from(reason: DropReason) -> Self {
        match reason {
            DropReason::ServiceUnavailable(e) => MmsError::ServiceUnavailable(e),
            DropReason::CommunicationFault(e) => MmsError::CommunicationFault(e),
        }
    }
}
