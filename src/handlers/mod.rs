//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `audio` - Serving synthesized audio artifacts
//! - `presets` - Voice preset CRUD
//! - `synthesize` - Text-to-speech REST API
//! - `voices` - Voice catalog endpoints

pub mod api;
pub mod audio;
pub mod presets;
pub mod synthesize;
pub mod voices;

/// Longest text accepted by a synthesis request, in characters.
pub const MAX_TEXT_LENGTH: usize = 50_000;

/// Voice catalog requests allowed per endpoint per minute.
pub const VOICES_PER_MINUTE: usize = 10;

/// Synthesis requests allowed per endpoint per minute.
pub const SYNTHESIZE_PER_MINUTE: usize = 5;
