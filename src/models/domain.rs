use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use validator::Validate;

/// Closed set of housing arrangements a listing can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    SharedBed,
    PrivateRoom,
    FullApartment,
}

impl HousingType {
    pub const ALL: [HousingType; 3] = [
        HousingType::SharedBed,
        HousingType::PrivateRoom,
        HousingType::FullApartment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HousingType::SharedBed => "shared_bed",
            HousingType::PrivateRoom => "private_room",
            HousingType::FullApartment => "full_apartment",
        }
    }
}

impl fmt::Display for HousingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Reputation tier earned by an owner through visit reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerBadge {
    #[default]
    New,
    Verified,
    Trusted,
    Flagged,
}

/// Aggregate owner-reliability metrics attached to a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrustStats {
    #[validate(range(min = 0.0, max = 100.0))]
    pub average_trust_score: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub badge: OwnerBadge,
}

/// A rentable unit as supplied by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[serde(rename = "type")]
    pub housing_type: HousingType,
    pub city: String,
    #[serde(default, alias = "amenities")]
    pub amenity_tags: BTreeSet<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "ownerStats")]
    #[validate(nested)]
    pub trust_stats: Option<TrustStats>,
}

impl Listing {
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenity_tags.contains(amenity)
    }
}

/// A seeker's stated housing preferences
///
/// `budget` must be strictly positive; the scorer does not check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeekerCriteria {
    #[serde(alias = "university")]
    pub university_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub budget: f64,
    #[serde(alias = "type")]
    pub preferred_type: HousingType,
    #[serde(default, alias = "preferences")]
    pub preference_tags: BTreeSet<String>,
}

/// Rounded sub-scores behind a listing's final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub distance: u8,
    pub price: u8,
    pub housing_type: u8,
    pub amenity: u8,
    pub price_competitiveness: u8,
    pub distance_bonus: u8,
}

/// Result of scoring one listing against one seeker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredListing<'a> {
    pub listing: &'a Listing,
    pub preference_score: u8,
    pub trust_score: u8,
    pub final_score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Scoring weights for both weighted sums
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub preference: PreferenceWeights,
    pub overall: OverallWeights,
}

/// Blend of the four preference sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    pub distance: f64,
    pub price: f64,
    pub housing_type: f64,
    pub amenity: f64,
}

impl PreferenceWeights {
    pub fn sum(&self) -> f64 {
        self.distance + self.price + self.housing_type + self.amenity
    }
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self {
            distance: 0.35,
            price: 0.30,
            housing_type: 0.20,
            amenity: 0.15,
        }
    }
}

/// Blend producing the final ranking score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallWeights {
    pub preference: f64,
    pub trust: f64,
    pub price_competitiveness: f64,
    pub distance_bonus: f64,
}

impl OverallWeights {
    pub fn sum(&self) -> f64 {
        self.preference + self.trust + self.price_competitiveness + self.distance_bonus
    }
}

impl Default for OverallWeights {
    fn default() -> Self {
        Self {
            preference: 0.4,
            trust: 0.3,
            price_competitiveness: 0.2,
            distance_bonus: 0.1,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            preference: PreferenceWeights::default(),
            overall: OverallWeights::default(),
        }
    }
}
