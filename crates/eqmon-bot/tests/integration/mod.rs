//! Integration tests for eqmon-bot.
//!
//! These tests run the full pipeline against local mock sources:
//! - Streaming connection lifecycle and reconnection
//! - HTTP polling
//! - End-to-end cycles through a mock contract

pub mod common;
