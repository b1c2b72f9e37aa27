//! Shared helpers for uxlens-analysis integration tests

#![allow(dead_code)]

pub mod fixtures;
