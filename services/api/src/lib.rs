pub mod adapters;
pub mod cache;
pub mod config;
pub mod error;
pub mod web;
