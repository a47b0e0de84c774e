use crate::core::{
    distance::distance_km,
    scoring::{
        amenity_score, distance_bonus, distance_score, final_composite, housing_type_score,
        preference_composite, price_competitiveness, price_score, round_score, validate_weights,
        OverallParts, PreferenceParts, NEUTRAL_SCORE,
    },
    tables::{ScoringError, ScoringTables},
};
use crate::models::{Listing, ScoreBreakdown, ScoredListing, ScoringWeights, SeekerCriteria};

/// Number of matches returned when the caller does not ask for a limit
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// Ranks listings against a seeker's criteria
///
/// # Scoring Stages
/// 1. Preference composite (distance, price, type, amenities)
/// 2. Owner trust
/// 3. Price competitiveness within the listing's (city, type) group
/// 4. Distance bonus
///
/// The scorer holds only immutable tables and weights, so one instance can be
/// shared across threads and every call is deterministic.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    tables: ScoringTables,
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(tables: ScoringTables) -> Self {
        Self {
            tables,
            weights: ScoringWeights::default(),
        }
    }

    /// Build a scorer with custom weights; each weight group must total 1.0
    pub fn with_weights(tables: ScoringTables, weights: ScoringWeights) -> Result<Self, ScoringError> {
        validate_weights(&weights)?;
        Ok(Self { tables, weights })
    }

    pub fn with_default_tables() -> Self {
        Self::new(ScoringTables::default())
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one listing for a seeker
    ///
    /// `catalog` is used only for the relative price comparison and may
    /// contain `listing` itself. Missing coordinates or trust stats fall back
    /// to the neutral score; nothing here fails.
    ///
    /// `criteria.budget` must be strictly positive.
    pub fn score_listing<'a>(
        &self,
        criteria: &SeekerCriteria,
        listing: &'a Listing,
        catalog: &[Listing],
    ) -> ScoredListing<'a> {
        let distance = match (self.tables.university(&criteria.university_id), listing.coordinates) {
            (Some(campus), Some(location)) => distance_score(distance_km(campus, location)),
            _ => NEUTRAL_SCORE,
        };

        let preference_parts = PreferenceParts {
            distance,
            price: price_score(listing.price, criteria.budget),
            housing_type: housing_type_score(
                &self.tables,
                criteria.preferred_type,
                listing.housing_type,
            ),
            amenity: amenity_score(&self.tables, &criteria.preference_tags, listing),
        };
        let preference = preference_composite(&preference_parts, &self.weights.preference);

        let trust = match &listing.trust_stats {
            Some(stats) => stats.average_trust_score.clamp(0.0, 100.0),
            None => NEUTRAL_SCORE,
        };

        let overall_parts = OverallParts {
            preference,
            trust,
            price_competitiveness: price_competitiveness(listing, catalog),
            distance_bonus: distance_bonus(distance),
        };
        let final_score = final_composite(&overall_parts, &self.weights.overall);

        tracing::trace!(
            listing_id = %listing.id,
            distance = preference_parts.distance,
            price = preference_parts.price,
            housing_type = preference_parts.housing_type,
            amenity = preference_parts.amenity,
            trust,
            price_competitiveness = overall_parts.price_competitiveness,
            final_score,
            "Scored listing"
        );

        ScoredListing {
            listing,
            preference_score: round_score(preference),
            trust_score: round_score(trust),
            final_score: round_score(final_score),
            breakdown: ScoreBreakdown {
                distance: round_score(preference_parts.distance),
                price: round_score(preference_parts.price),
                housing_type: round_score(preference_parts.housing_type),
                amenity: round_score(preference_parts.amenity),
                price_competitiveness: round_score(overall_parts.price_competitiveness),
                distance_bonus: round_score(overall_parts.distance_bonus),
            },
        }
    }

    /// Score every listing in the catalog and return the best `limit`
    ///
    /// Results are ordered by final score, highest first; equal scores keep
    /// their catalog order.
    pub fn rank_top_matches<'a>(
        &self,
        criteria: &SeekerCriteria,
        catalog: &'a [Listing],
        limit: usize,
    ) -> Vec<ScoredListing<'a>> {
        self.rank_candidates(criteria, catalog.iter(), catalog, limit)
    }

    /// Rank a subset of listings while comparing prices against a full catalog
    ///
    /// Used when a search filter narrows the candidates: price competitiveness
    /// still looks at every listing in `catalog`.
    pub fn rank_candidates<'a, I>(
        &self,
        criteria: &SeekerCriteria,
        candidates: I,
        catalog: &[Listing],
        limit: usize,
    ) -> Vec<ScoredListing<'a>>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        if limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredListing<'a>> = candidates
            .into_iter()
            .map(|listing| self.score_listing(criteria, listing, catalog))
            .collect();
        let total_candidates = scored.len();

        // Vec::sort_by is stable, so ties keep candidate order
        scored.sort_by(|a, b| b.final_score.cmp(&a.final_score));
        scored.truncate(limit);

        tracing::debug!(
            university = %criteria.university_id,
            total_candidates,
            returned = scored.len(),
            "Ranked listings"
        );

        scored
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::with_default_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, HousingType, TrustStats, OwnerBadge};
    use std::collections::BTreeSet;

    const CAIRO_LAT: f64 = 30.0237;
    const CAIRO_LON: f64 = 31.2086;

    /// Degrees of latitude spanning `km` on the scoring sphere
    fn km_north(km: f64) -> f64 {
        (km / 6371.0).to_degrees()
    }

    fn create_listing(id: &str, city: &str, price: f64, north_km: Option<f64>) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            price,
            housing_type: HousingType::SharedBed,
            city: city.to_string(),
            amenity_tags: BTreeSet::new(),
            coordinates: north_km.map(|km| Coordinates::new(CAIRO_LAT + km_north(km), CAIRO_LON)),
            trust_stats: None,
        }
    }

    fn create_criteria() -> SeekerCriteria {
        SeekerCriteria {
            university_id: "cairo".to_string(),
            budget: 1000.0,
            preferred_type: HousingType::SharedBed,
            preference_tags: BTreeSet::new(),
        }
    }

    #[test]
    fn test_close_affordable_listing_scores_75() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![create_listing("a", "Cairo", 900.0, Some(3.0))];

        let scored = scorer.score_listing(&create_criteria(), &catalog[0], &catalog);

        assert_eq!(scored.breakdown.distance, 100);
        assert_eq!(scored.breakdown.price, 100);
        assert_eq!(scored.preference_score, 100);
        assert_eq!(scored.trust_score, 50);
        assert_eq!(scored.breakdown.price_competitiveness, 50);
        assert_eq!(scored.breakdown.distance_bonus, 100);
        assert_eq!(scored.final_score, 75);
    }

    #[test]
    fn test_far_pricier_listing_scores_51() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![create_listing("b", "Giza", 1300.0, Some(20.0))];

        let scored = scorer.score_listing(&create_criteria(), &catalog[0], &catalog);

        assert_eq!(scored.breakdown.distance, 20);
        assert_eq!(scored.breakdown.price, 40);
        assert_eq!(scored.preference_score, 54);
        assert_eq!(scored.breakdown.distance_bonus, 40);
        assert_eq!(scored.final_score, 51);
    }

    #[test]
    fn test_missing_coordinates_are_neutral() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![create_listing("a", "Cairo", 900.0, None)];

        let scored = scorer.score_listing(&create_criteria(), &catalog[0], &catalog);

        assert_eq!(scored.breakdown.distance, 50);
        assert_eq!(scored.breakdown.distance_bonus, 40);
    }

    #[test]
    fn test_unknown_university_is_neutral() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![create_listing("a", "Cairo", 900.0, Some(1.0))];
        let mut criteria = create_criteria();
        criteria.university_id = "nowhere".to_string();

        let scored = scorer.score_listing(&criteria, &catalog[0], &catalog);
        assert_eq!(scored.breakdown.distance, 50);
    }

    #[test]
    fn test_trust_stats_are_used_when_present() {
        let scorer = MatchScorer::with_default_tables();
        let mut listing = create_listing("a", "Cairo", 900.0, Some(3.0));
        listing.trust_stats = Some(TrustStats {
            average_trust_score: 92.0,
            total_reviews: 7,
            badge: OwnerBadge::Trusted,
        });
        let catalog = vec![listing];

        let scored = scorer.score_listing(&create_criteria(), &catalog[0], &catalog);

        assert_eq!(scored.trust_score, 92);
        // 40 + 27.6 + 10 + 10
        assert_eq!(scored.final_score, 88);
    }

    #[test]
    fn test_zero_trust_score_is_not_treated_as_missing() {
        let scorer = MatchScorer::with_default_tables();
        let mut listing = create_listing("a", "Cairo", 900.0, Some(3.0));
        listing.trust_stats = Some(TrustStats {
            average_trust_score: 0.0,
            total_reviews: 3,
            badge: OwnerBadge::Flagged,
        });
        let catalog = vec![listing];

        let scored = scorer.score_listing(&create_criteria(), &catalog[0], &catalog);
        assert_eq!(scored.trust_score, 0);
    }

    #[test]
    fn test_rank_orders_by_final_score() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![
            create_listing("b", "Giza", 1300.0, Some(20.0)),
            create_listing("a", "Cairo", 900.0, Some(3.0)),
        ];

        let ranked = scorer.rank_top_matches(&create_criteria(), &catalog, DEFAULT_MATCH_LIMIT);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].listing.id, "a");
        assert_eq!(ranked[0].final_score, 75);
        assert_eq!(ranked[1].listing.id, "b");
        assert_eq!(ranked[1].final_score, 51);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let scorer = MatchScorer::with_default_tables();
        let catalog: Vec<Listing> = ["x", "y", "z"]
            .iter()
            .enumerate()
            .map(|(i, id)| create_listing(id, &format!("City {}", i), 900.0, Some(3.0)))
            .collect();

        let ranked = scorer.rank_top_matches(&create_criteria(), &catalog, 10);
        let ids: Vec<&str> = ranked.iter().map(|s| s.listing.id.as_str()).collect();

        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_zero_limit_returns_nothing() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![create_listing("a", "Cairo", 900.0, Some(3.0))];

        assert!(scorer.rank_top_matches(&create_criteria(), &catalog, 0).is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let scorer = MatchScorer::with_default_tables();
        let catalog: Vec<Listing> = (0..8)
            .map(|i| create_listing(&i.to_string(), "Cairo", 800.0 + i as f64 * 50.0, Some(i as f64 * 3.0)))
            .collect();

        let ranked = scorer.rank_top_matches(&create_criteria(), &catalog, DEFAULT_MATCH_LIMIT);
        assert_eq!(ranked.len(), DEFAULT_MATCH_LIMIT);
    }

    #[test]
    fn test_rank_candidates_compares_against_full_catalog() {
        let scorer = MatchScorer::with_default_tables();
        let catalog = vec![
            create_listing("cheap", "Cairo", 600.0, Some(3.0)),
            create_listing("pricey", "Cairo", 1400.0, Some(3.0)),
        ];

        let ranked = scorer.rank_candidates(&create_criteria(), catalog.iter().skip(1), &catalog, 5);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].listing.id, "pricey");
        assert_eq!(ranked[0].breakdown.price_competitiveness, 80);
    }

    #[test]
    fn test_custom_weights_must_sum_to_one() {
        let mut weights = ScoringWeights::default();
        weights.preference.amenity = 0.5;

        let result = MatchScorer::with_weights(ScoringTables::default(), weights);
        assert!(result.is_err());
    }
}
