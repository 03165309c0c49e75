pub mod fee_entry;
pub mod student;

pub use fee_entry::NewFeeEntry;
pub use student::{NewStudent, StudentUpdate};
