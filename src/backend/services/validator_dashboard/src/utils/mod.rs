pub mod errors;
pub mod format;
pub mod slot_time;
