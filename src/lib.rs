/// Copydesk - Configuration Workspace Core
///
/// Core library for the multi-step news-generation configuration workflow:
/// section selection and ordering, per-audience prompt drafting, comparative
/// generation across models, and versioned publishing.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
