use crate::core::labels::{owner_badge, recommendation_text, MatchTier, OwnerBadgeView};
use crate::models::domain::{Coordinates, Listing, ScoreBreakdown, ScoredListing};
use crate::services::CacheStats;
use serde::{Deserialize, Serialize};

/// One ranked listing with its scores and display extras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub listing: Listing,
    pub preference_score: u8,
    pub trust_score: u8,
    pub final_score: u8,
    pub breakdown: ScoreBreakdown,
    pub tier: MatchTier,
    pub label: String,
    pub text_class: String,
    pub color_class: String,
    pub recommendation: String,
    pub owner_badge: OwnerBadgeView,
}

impl From<&ScoredListing<'_>> for RankedMatch {
    fn from(scored: &ScoredListing<'_>) -> Self {
        let tier = MatchTier::from_score(scored.final_score);
        Self {
            listing: scored.listing.clone(),
            preference_score: scored.preference_score,
            trust_score: scored.trust_score,
            final_score: scored.final_score,
            breakdown: scored.breakdown,
            tier,
            label: tier.label().to_string(),
            text_class: tier.text_class().to_string(),
            color_class: tier.badge_class().to_string(),
            recommendation: recommendation_text(scored),
            owner_badge: owner_badge(scored.listing.trust_stats.as_ref()),
        }
    }
}

/// Response for the ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankMatchesResponse {
    pub request_id: String,
    pub matches: Vec<RankedMatch>,
    pub total_candidates: usize,
    /// Limit actually applied after defaulting and capping the requested one
    pub applied_limit: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Response for listing search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListingsResponse {
    pub listings: Vec<Listing>,
    pub total_results: usize,
}

/// A university known to the scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversityEntry {
    pub id: String,
    pub coordinates: Coordinates,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::HousingType;
    use std::collections::BTreeSet;

    #[test]
    fn test_ranked_match_carries_display_extras() {
        let listing = Listing {
            id: "a".to_string(),
            title: "Room near campus".to_string(),
            price: 900.0,
            housing_type: HousingType::SharedBed,
            city: "Cairo".to_string(),
            amenity_tags: BTreeSet::new(),
            coordinates: None,
            trust_stats: None,
        };
        let scored = ScoredListing {
            listing: &listing,
            preference_score: 100,
            trust_score: 50,
            final_score: 75,
            breakdown: ScoreBreakdown {
                distance: 100,
                price: 100,
                housing_type: 100,
                amenity: 100,
                price_competitiveness: 50,
                distance_bonus: 100,
            },
        };

        let ranked = RankedMatch::from(&scored);

        assert_eq!(ranked.tier, MatchTier::VeryGood);
        assert_eq!(ranked.label, "Very good");
        assert_eq!(ranked.text_class, "text-emerald-500");
        assert_eq!(ranked.recommendation, "Very good match • Strongly fits your preferences");
        assert_eq!(ranked.owner_badge.text, "New owner");

        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["finalScore"], 75);
        assert_eq!(json["textClass"], "text-emerald-500");
        assert_eq!(json["listing"]["type"], "shared_bed");
    }
}
