pub mod controller;
pub mod delay;
mod error;
pub mod status;
pub mod table;

pub use controller::{ProcessController, Services};
pub use error::{Error, MalformedRecord};
pub use status::{ProcessStatusSnapshot, StatusRecordReader};
