//! Core types and definitions for the lane-runner pursuit subsystem.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, tuning config, snapshots, events, and constants.
//! It has no dependency on an ECS runtime or any game framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::PursuitError;
