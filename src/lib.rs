// Library exports for Atrium
// This allows integration tests to drive the console and its controllers

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod extractors;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;
