//! uxlens Core - Foundation crate for the uxlens design evaluation service
//!
//! This crate provides functionality shared by every uxlens crate:
//!
//! # Modules
//!
//! - [`config`] - Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] - Design tree, frame, critique and ledger entities
//! - [`infrastructure`] - Ledger repository implementations (PostgreSQL and in-memory)
//! - [`logging`] - Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! uxlens-core/
//! ├── domain/
//! │   ├── design/       # Normalized tree, frames, detected elements
//! │   ├── critique.rs   # Canonical critique result
//! │   └── ledger/       # Designs, versions, frame evaluations, repository trait
//! ├── infrastructure/
//! │   └── ledger/       # PostgreSQL and in-memory ledger stores
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use uxlens_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `UXLENS__` prefix with double underscore separators:
//!
//! ```bash
//! UXLENS__SERVER__PORT=3000
//! UXLENS__EVALUATION__MIN_FRAME_DIMENSION=120
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
