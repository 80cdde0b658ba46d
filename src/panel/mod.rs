pub mod client;
pub mod mock;

pub use client::{Mode, PanelClient};
