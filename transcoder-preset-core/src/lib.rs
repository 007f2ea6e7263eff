#![doc = "transcoder-preset-core: reconciliation logic for Elastic Transcoder presets."]

//! This crate holds the data model, the client contract and the
//! present/absent reconcilers. It knows nothing about credentials or
//! transport; callers hand in a [`contract::PresetClient`].
//!
//! # Usage
//! Build a [`descriptor::PresetDescriptor`], pick [`reconcile::ReconcileOptions`]
//! and call [`reconcile::reconcile`] with any client implementation.

pub mod contract;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod locator;
pub mod reconcile;

pub use contract::{
    ClientError, CreatePresetRequest, CreatedPreset, PresetClient, PresetPage, PresetSummary,
};
pub use descriptor::{Container, DesiredState, PresetDescriptor};
pub use error::ReconcileError;
pub use locator::{find_preset_by_name, NameMatchPolicy};
pub use reconcile::{ensure_absent, ensure_present, reconcile, ReconcileOptions, ReconcileOutcome};
