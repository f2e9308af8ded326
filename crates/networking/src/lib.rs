//! Earnin Networking - HTTP access to the remote config document

pub mod http;

pub use http::ConfigClient;
