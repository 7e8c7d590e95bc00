//! Minimal model of the data returned by the activity endpoint.
//!
//! Parsed loosely: every field is optional, a response without
//! `activity` means no activity matches the filters.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    // Description of the suggested activity.
    pub activity: Option<String>,
    // How many people it takes.
    pub participants: Option<u32>,
    // Cost indicator, 0 is free.
    pub price: Option<f64>,
    // How accessible it is, 0 is the most accessible.
    pub accessibility: Option<f64>,
}
