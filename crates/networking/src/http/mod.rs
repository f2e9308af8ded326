//! HTTP client for the config endpoint

mod client;

pub use client::ConfigClient;
