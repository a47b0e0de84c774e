// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Coordinates, HousingType, Listing, OverallWeights, OwnerBadge, PreferenceWeights,
    ScoreBreakdown, ScoredListing, ScoringWeights, SeekerCriteria, TrustStats,
};
pub use requests::{resolve_limit, ListingFilter, RankMatchesRequest, ScoreListingsRequest};
pub use responses::{
    ErrorResponse, HealthResponse, RankMatchesResponse, RankedMatch, SearchListingsResponse,
    UniversityEntry,
};
