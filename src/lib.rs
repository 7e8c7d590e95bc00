#![recursion_limit = "256"]

pub mod fs;
pub mod termio;

mod activity;
mod client;
mod models;
mod photo;
mod schema;

pub use activity::{Activity, ActivityType, NO_MATCH_MESSAGE};
pub use client::Client;
pub use photo::Photo;
pub use schema::{field, CastError, Field, Schema, Shape, Typed};
