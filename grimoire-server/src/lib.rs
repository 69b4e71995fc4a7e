//! Grimoire Server Library
//!
//! This module exports the server components for testing and reuse.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
