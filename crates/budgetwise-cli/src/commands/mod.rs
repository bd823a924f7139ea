//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `inputs` - Shared utilities (CSV / manual expense loading, survey files, config)
//! - `budget` - Budget commands (summarize, prompt, advise)
//! - `survey` - Survey template
//! - `prompts` - Prompt library management commands
//! - `provider` - Advice provider checks and resolved config
//! - `serve` - Web server command

pub mod budget;
pub mod inputs;
pub mod prompts;
pub mod provider;
pub mod serve;
pub mod survey;

// Re-export command functions for main.rs
pub use budget::*;
pub use inputs::*;
pub use prompts::*;
pub use provider::*;
pub use serve::*;
pub use survey::*;
