// UI and formatting module

pub mod formatters;
pub mod system_formatters;

pub use formatters::{format_bytes, format_time};
