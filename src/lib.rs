//! Inkpost - A small personal blog service
//!
//! This library provides the core functionality for the Inkpost blog service.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
