pub mod config;
pub mod monitor;
pub mod process_control;
pub mod system_monitor;
pub mod view_mode;

pub use config::Config;
pub use monitor::MonitorCore;
pub use process_control::{ControlFailure, ControlOperation, ControlResult, ProcessController};
pub use view_mode::{ViewMode, ViewModeController};
