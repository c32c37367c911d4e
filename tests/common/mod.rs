//! Shared fixtures for the HTTP integration tests

pub mod mock_server;
