//! uxlens Orchestrator - HTTP API and evaluation runs
//!
//! This crate exposes the uxlens API and drives evaluation runs: it fetches a design
//! document, runs the deterministic analysis, asks the critique model about every
//! requested frame and records the outcome as a new design version.
//!
//! # Architecture
//!
//! ```text
//! uxlens-orchestrator/
//! ├── presentation/       # HTTP layer
//! │   ├── controllers/    # Request handlers
//! │   ├── models.rs       # DTOs with OpenAPI schemas
//! │   └── routes.rs       # API route definitions
//! ├── application/
//! │   ├── evaluation_run.rs  # Background run pipeline
//! │   ├── workflow.rs        # Job lifecycle
//! │   └── use_cases.rs
//! ├── infrastructure/
//! │   ├── design_source.rs   # Design-tool REST client
//! │   └── job_store/         # Job progress storage
//! └── domain/
//! ```
//!
//! # API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/v1/designs` | POST | Register a design |
//! | `/api/v1/designs/{design_id}/evaluations` | POST | Start an evaluation run |
//! | `/api/v1/designs/{design_id}/evaluations` | GET | Critiqued frames of a version |
//! | `/api/v1/designs/{design_id}/versions` | GET | Version history |
//! | `/api/v1/designs/{design_id}/revert` | POST | Move the current-version pointer |
//! | `/api/v1/jobs/{job_id}/progress` | GET | Poll a run |
//! | `/health` | GET | Health check |

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
