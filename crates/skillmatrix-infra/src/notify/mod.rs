//! Outbound notification adapters.

pub mod http;

pub use http::HttpNotificationDispatcher;
