mod call_id;
mod completion_token;
mod download_message;
mod result_code;
mod send_message;

pub use call_id::CallId;
pub use completion_token::{CompletionToken, CompletionTokens};
pub use download_message::DownloadMessage;
pub use result_code::ResultCode;
pub use send_message::SendMessage;
