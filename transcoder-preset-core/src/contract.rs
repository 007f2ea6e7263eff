#![allow(unused)]

//! # contract: interface to the remote preset catalog
//!
//! This module defines the single trait ([`PresetClient`]) the reconcilers
//! talk to, plus the plain data types that travel across it.
//!
//! ## Interface & Extensibility
//! - Implement [`PresetClient`] to back the reconcilers with a real service,
//!   a local emulator or a test fake.
//! - All methods are async and return boxed errors; the reconcilers wrap
//!   them into [`crate::error::ReconcileError`] with the operation that failed.
//! - Credentials, region and transport are the implementor's business.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so `MockPresetClient` is available
//!   to this crate's tests and, through the default `test-export-mocks`
//!   feature, to downstream crates.

use async_trait::async_trait;
use mockall::{automock, predicate::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Boxed error returned by every client call.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// A preset as listed by the service.
///
/// `name` is not unique across the catalog; `id` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetSummary {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub container: Option<String>,
}

/// One page of the preset catalog.
#[derive(Debug, Clone, Default)]
pub struct PresetPage {
    pub presets: Vec<PresetSummary>,
    /// Continuation token for the next page; `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Everything the service needs to create a preset.
///
/// The encoding blocks are passed through untouched; only their presence is
/// checked before the call is made.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePresetRequest {
    pub name: String,
    pub description: Option<String>,
    pub container: String,
    pub video: Option<Value>,
    pub audio: Option<Value>,
    pub thumbnails: Option<Value>,
}

/// Result of a successful create call.
#[derive(Debug, Clone)]
pub struct CreatedPreset {
    pub preset: PresetSummary,
    /// Set by the service when the settings are valid but unusual.
    pub warning: Option<String>,
}

/// Access to the remote preset catalog.
///
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PresetClient: Send + Sync {
    /// Fetch one page of presets in ascending order, starting at `page_token`
    /// (or the beginning of the catalog when `None`).
    async fn list_presets(&self, page_token: Option<String>) -> Result<PresetPage, ClientError>;

    /// Create a new preset and return the identifiers the service assigned.
    async fn create_preset(&self, req: CreatePresetRequest) -> Result<CreatedPreset, ClientError>;

    /// Delete a preset by id.
    async fn delete_preset(&self, id: String) -> Result<(), ClientError>;
}
