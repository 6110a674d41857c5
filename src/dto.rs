//! # SleepWell: shared response shapes
//!
//! Request bodies live next to their models; this module holds the
//! responses several handlers share plus the export bundle.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{journal::JournalEntry, sleep_goal::SleepGoal, sleep_log::SleepLog};

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

// ============================================================================
// Export
// ============================================================================

/// GET /api/export: the caller's rows exactly as stored.
#[derive(Debug, Serialize)]
pub struct ExportBundle {
    pub logs: Vec<SleepLog>,
    pub goals: Vec<SleepGoal>,
    pub journal: Vec<JournalEntry>,
}

// ============================================================================
// System
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: &'static str,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub database: &'static str,
}
