pub mod client;
pub mod types;

pub use client::HookClient;
pub use types::*;
