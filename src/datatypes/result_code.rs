use num_enum::TryFromPrimitive;
use std::fmt;

/// Failure categories a transport service reports through a completion token.
///
/// These codes are part of the public contract between applications and the
/// transport service. The client only carries tokens; it never produces or
/// interprets a result code itself.
#[derive(TryFromPrimitive)]
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResultCode {
    /// Unspecified error
    Unspecified = 1,

    /// The access point configuration for MMS is invalid
    InvalidApn = 2,

    /// The MMS centre could not be reached
    UnableToConnect = 3,

    /// The transport exchange with the MMS centre failed
    HttpFailure = 4,
}

impl ResultCode {
    pub fn description(&self) -> &'static str {
        match self {
            ResultCode::Unspecified => "unspecified error",
            ResultCode::InvalidApn => "invalid access point configuration",
            ResultCode::UnableToConnect => "unable to connect to the MMS centre",
            ResultCode::HttpFailure => "transport protocol failure",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), *self as i32)
    }
}
