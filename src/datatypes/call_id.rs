use num_enum::TryFromPrimitive;

/// The call_id field of a frame header identifies which transport service
/// operation the frame carries.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallId {
    /// Submit an encoded message for sending
    SendMessage = 0x0000_0001,

    /// Fetch a message from the carrier's storage
    DownloadMessage = 0x0000_0002,
}
