//! Shared helpers for uxlens-orchestrator integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
pub mod helpers;
pub mod mocks;
