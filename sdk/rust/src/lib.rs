//! Async client for the action gateway.

pub mod client;

pub use client::{ChatTurn, GatewayClient, GatewayReply};
pub use reqwest::Method;
