//! Trackrecord - multi-strategy investment track record viewer
//!
//! This library resolves symbolic time ranges into concrete dates, fetches
//! the algorithm's performance chart and statistics table from the analytics
//! backend, and keeps the dashboard state consistent across overlapping
//! fetches.

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod range;
pub mod views;
