//! Request logging for the proxy server.

pub mod logger;
