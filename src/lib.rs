//! Traffic prediction TUI
//!
//! This library exposes the viewer's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod state;
