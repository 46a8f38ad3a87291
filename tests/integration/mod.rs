//! Integration tests with mock HTTP server

pub mod mock_server;
pub mod requests;
pub mod dispatcher;
pub mod error_handling;
