//! Retrieval-augmented chat service for professor recommendations.
//!
//! The pipeline for a single request: embed the latest user message, query
//! the vector index for the nearest professor records, append the formatted
//! matches to the user's message, send the augmented conversation to the
//! chat model, and relay its token stream back to the caller.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
