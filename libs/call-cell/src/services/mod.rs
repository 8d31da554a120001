pub mod call_log;
pub mod vapi;

pub use call_log::{CallLogQueue, CallLogWorker, DrainReport};
pub use vapi::VapiClient;
