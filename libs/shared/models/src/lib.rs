pub mod error;
pub mod record;

pub use error::AppError;
pub use record::Record;
