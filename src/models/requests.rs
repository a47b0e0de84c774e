use crate::models::domain::{HousingType, Listing, SeekerCriteria};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Search constraints narrowing the catalog; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    #[serde(default, rename = "type")]
    pub housing_type: Option<HousingType>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

/// Request to rank the service catalog for a seeker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankMatchesRequest {
    #[validate(nested)]
    pub criteria: SeekerCriteria,
    /// Negative values are treated as zero
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    #[validate(nested)]
    pub filter: Option<ListingFilter>,
}

/// Request to rank a caller-supplied catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreListingsRequest {
    #[validate(nested)]
    pub criteria: SeekerCriteria,
    #[validate(nested)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Resolve a requested limit against the configured default and cap
pub fn resolve_limit(requested: Option<i64>, default_limit: usize, max_limit: usize) -> usize {
    match requested {
        None => default_limit.min(max_limit),
        Some(limit) if limit <= 0 => 0,
        Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX).min(max_limit),
    }
}
