pub mod client;
pub mod generation;
pub mod logging;
pub mod prompts;
pub mod publish;
pub mod store;
pub mod workflow;
