pub mod import;
pub mod log;
pub mod status;
