use crate::core::tables::{ScoringError, ScoringTables};
use crate::models::{HousingType, Listing, OverallWeights, PreferenceWeights, ScoringWeights};
use std::collections::BTreeSet;

/// Score used whenever an input needed for a sub-score is missing
pub const NEUTRAL_SCORE: f64 = 50.0;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Map a campus distance to a 0-100 score
///
/// Bucket edges belong to the closer bucket:
/// ≤5 km → 100, ≤10 km → 70, ≤15 km → 40, farther → 20
#[inline]
pub fn distance_score(distance_km: f64) -> f64 {
    if distance_km <= 5.0 {
        100.0
    } else if distance_km <= 10.0 {
        70.0
    } else if distance_km <= 15.0 {
        40.0
    } else {
        20.0
    }
}

/// Map price against budget to a 0-100 score
///
/// `budget` must be strictly positive; callers validate it upstream.
#[inline]
pub fn price_score(price: f64, budget: f64) -> f64 {
    let ratio = price / budget;

    if ratio <= 1.0 {
        100.0
    } else if ratio <= 1.1 {
        80.0
    } else if ratio <= 1.2 {
        60.0
    } else if ratio <= 1.3 {
        40.0
    } else {
        20.0
    }
}

/// Score how well a listing's type fits the preferred one
///
/// Types outside the alternate list score 30. The default tables list every
/// other type as an alternate, so only extended tables reach that branch.
#[inline]
pub fn housing_type_score(
    tables: &ScoringTables,
    preferred: HousingType,
    offered: HousingType,
) -> f64 {
    if preferred == offered {
        100.0
    } else if tables.is_alternate(preferred, offered) {
        60.0
    } else {
        30.0
    }
}

/// Share of the amenities implied by the seeker's tags that the listing has
pub fn amenity_score(
    tables: &ScoringTables,
    preference_tags: &BTreeSet<String>,
    listing: &Listing,
) -> f64 {
    if preference_tags.is_empty() {
        return 100.0;
    }

    let required = tables.required_amenities(preference_tags);
    if required.is_empty() {
        return 100.0;
    }

    let present = required
        .iter()
        .filter(|amenity| listing.has_amenity(amenity))
        .count();

    (present as f64 / required.len() as f64) * 100.0
}

/// Score a listing's price against its (city, type) peers in the catalog
///
/// The target always counts once towards the mean, whether or not the catalog
/// contains it; peers are matched by id so the target is never double counted.
/// A listing with no peers gets the neutral score.
pub fn price_competitiveness(listing: &Listing, catalog: &[Listing]) -> f64 {
    let (peer_count, peer_total) = catalog
        .iter()
        .filter(|peer| {
            peer.id != listing.id
                && peer.city == listing.city
                && peer.housing_type == listing.housing_type
        })
        .fold((0usize, 0.0f64), |(count, total), peer| {
            (count + 1, total + peer.price)
        });

    if peer_count == 0 {
        return NEUTRAL_SCORE;
    }

    let mean = (peer_total + listing.price) / (peer_count + 1) as f64;

    if listing.price <= mean {
        ((mean / listing.price) * 80.0).min(100.0)
    } else {
        (100.0 - ((listing.price - mean) / mean) * 50.0).max(20.0)
    }
}

/// Coarse re-bucketing of the distance sub-score
#[inline]
pub fn distance_bonus(distance_score: f64) -> f64 {
    if distance_score >= 90.0 {
        100.0
    } else if distance_score >= 70.0 {
        70.0
    } else {
        40.0
    }
}

/// Sub-scores feeding the preference composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceParts {
    pub distance: f64,
    pub price: f64,
    pub housing_type: f64,
    pub amenity: f64,
}

/// Inputs to the final composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallParts {
    pub preference: f64,
    pub trust: f64,
    pub price_competitiveness: f64,
    pub distance_bonus: f64,
}

#[inline]
pub fn preference_composite(parts: &PreferenceParts, weights: &PreferenceWeights) -> f64 {
    clamp_score(
        parts.distance * weights.distance
            + parts.price * weights.price
            + parts.housing_type * weights.housing_type
            + parts.amenity * weights.amenity,
    )
}

#[inline]
pub fn final_composite(parts: &OverallParts, weights: &OverallWeights) -> f64 {
    clamp_score(
        parts.preference * weights.preference
            + parts.trust * weights.trust
            + parts.price_competitiveness * weights.price_competitiveness
            + parts.distance_bonus * weights.distance_bonus,
    )
}

/// Clamp a raw score into 0-100
#[inline]
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Round a 0-100 score to the nearest integer, halves rounding up
#[inline]
pub fn round_score(score: f64) -> u8 {
    clamp_score(score).round() as u8
}

/// Check that each weight group totals 1.0
pub fn validate_weights(weights: &ScoringWeights) -> Result<(), ScoringError> {
    let preference = weights.preference.sum();
    if (preference - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoringError::WeightsDoNotSumToOne {
            group: "preference",
            sum: preference,
        });
    }

    let overall = weights.overall.sum();
    if (overall - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoringError::WeightsDoNotSumToOne {
            group: "overall",
            sum: overall,
        });
    }

    Ok(())
}
