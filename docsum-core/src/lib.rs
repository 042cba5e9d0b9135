#![doc = "docsum-core: core workflow library for docsum."]

//! This crate holds the summarize workflow: file selection, the HTTP clients
//! for the summarization and conversion service, the state machine that ties
//! them together, and the pure rendering helpers.
//!
//! # Usage
//! Build a [`workflow::WorkflowController`] from a [`summarize::SummaryClient`],
//! an [`export::ExportClient`] and a [`contract::DownloadSink`], then drive it
//! with its named actions from any front end.

pub mod config;
pub mod contract;
pub mod error;
pub mod export;
pub mod present;
pub mod selector;
pub mod summarize;
pub mod workflow;
