// Platform-specific code module

pub mod gpu;
pub mod signal;

pub use signal::{is_alive, send_signal, ProcessSignal};
