//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click counting worker
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::UrlService::resolve`] finds the record
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel (never blocks)
//! 3. [`click_worker::run_click_worker`] applies the increment with retry
//! 4. The store performs `clicks = clicks + 1` atomically

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
