//! HTTP client for the Kaginawa server API

pub mod client;
pub mod nodes;
pub mod servers;

pub use client::{ClientOptions, KaginawaClient};
