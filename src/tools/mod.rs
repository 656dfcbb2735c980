//! Local tools the model can invoke via function calls.

pub mod base;
pub mod notify;
pub mod registry;
pub mod weather;

pub use base::Tool;
pub use notify::NotifyTool;
pub use registry::ToolRegistry;
pub use weather::WeatherTool;
