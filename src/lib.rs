//! Library exports for the link registry service
//!
//! This module exposes internal components for testing and potential library usage.

pub mod code;
pub mod config;
pub mod database;
pub mod error;
pub mod handler;
pub mod model;
pub mod registry;
pub mod route;
pub mod store;
