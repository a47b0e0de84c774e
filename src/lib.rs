//! Rental Match - listing ranking service for expatriate housing seekers
//!
//! This library provides the match-scoring engine that ranks rental listings
//! against a seeker's university, budget, preferred housing type and priority
//! tags, plus the HTTP surface and in-memory services around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchScorer, ScoringError, ScoringTables, DEFAULT_MATCH_LIMIT};
pub use models::{HousingType, Listing, ScoredListing, ScoringWeights, SeekerCriteria};
