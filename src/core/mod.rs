// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod labels;
pub mod matcher;
pub mod scoring;
pub mod tables;

pub use distance::{distance_km, haversine_distance};
pub use filters::{filter_listings, matches_filter};
pub use labels::{owner_badge, recommendation_text, MatchTier, OwnerBadgeView};
pub use matcher::{MatchScorer, DEFAULT_MATCH_LIMIT};
pub use scoring::{
    amenity_score, distance_bonus, distance_score, housing_type_score, price_competitiveness,
    price_score, NEUTRAL_SCORE,
};
pub use tables::{ScoringError, ScoringTables};
