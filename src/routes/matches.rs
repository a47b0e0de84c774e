use crate::core::MatchScorer;
use crate::models::{
    resolve_limit, ErrorResponse, HealthResponse, ListingFilter, RankMatchesRequest,
    RankMatchesResponse, RankedMatch, ScoreListingsRequest, ScoredListing,
    SearchListingsResponse, UniversityEntry,
};
use crate::services::{CacheKey, CacheManager, Catalog, CatalogError};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub scorer: Arc<MatchScorer>,
    pub cache: Option<Arc<CacheManager>>,
    pub default_limit: usize,
    pub max_limit: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/universities", web::get().to(list_universities))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/score", web::post().to(score_listings))
        .route("/listings/search", web::post().to(search_listings));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Ranked matches without the per-request fields; this is what the cache stores
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Ranking {
    matches: Vec<RankedMatch>,
    total_candidates: usize,
}

impl Ranking {
    fn from_scored(ranked: &[ScoredListing<'_>], total_candidates: usize) -> Self {
        Self {
            matches: ranked.iter().map(RankedMatch::from).collect(),
            total_candidates,
        }
    }

    fn into_response(self, applied_limit: usize) -> RankMatchesResponse {
        RankMatchesResponse {
            request_id: uuid::Uuid::new_v4().to_string(),
            matches: self.matches,
            total_candidates: self.total_candidates,
            applied_limit,
            generated_at: chrono::Utc::now(),
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_empty() { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: state.catalog.len(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
        timestamp: chrono::Utc::now(),
    })
}

/// Universities the scorer can measure distances from
///
/// GET /api/v1/universities
async fn list_universities(state: web::Data<AppState>) -> impl Responder {
    let universities: Vec<UniversityEntry> = state
        .scorer
        .tables()
        .universities
        .iter()
        .map(|(id, coordinates)| UniversityEntry {
            id: id.clone(),
            coordinates: *coordinates,
        })
        .collect();

    HttpResponse::Ok().json(universities)
}

/// Rank the service catalog for a seeker
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "criteria": {
///     "universityId": "cairo",
///     "budget": 1000,
///     "preferredType": "shared_bed",
///     "preferenceTags": ["safety"]
///   },
///   "limit": 5,
///   "filter": { "city": "Cairo", "maxPrice": 1500 }
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<RankMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {}", errors);
        return validation_error(errors);
    }

    let limit = resolve_limit(req.limit, state.default_limit, state.max_limit);

    let cache_key = match &state.cache {
        Some(_) => match CacheKey::ranking(&(&req.criteria, &req.filter), limit) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!("Failed to build cache key, skipping cache: {}", e);
                None
            }
        },
        None => None,
    };

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Ok(cached) = cache.get::<Ranking>(key).await {
            tracing::debug!("Serving cached ranking for {}", req.criteria.university_id);
            return HttpResponse::Ok().json(cached.into_response(limit));
        }
    }

    let catalog = state.catalog.listings();
    let default_filter = ListingFilter::default();
    let filter = req.filter.as_ref().unwrap_or(&default_filter);
    let candidates = state.catalog.search(filter);
    let total_candidates = candidates.len();

    let ranked = state
        .scorer
        .rank_candidates(&req.criteria, candidates, catalog, limit);
    let ranking = Ranking::from_scored(&ranked, total_candidates);

    tracing::info!(
        "Returning {} matches near {} (from {} candidates)",
        ranking.matches.len(),
        req.criteria.university_id,
        total_candidates
    );

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Err(e) = cache.set(key, &ranking).await {
            tracing::warn!("Failed to cache ranking: {}", e);
        }
    }

    HttpResponse::Ok().json(ranking.into_response(limit))
}

/// Rank a caller-supplied catalog
///
/// POST /api/v1/matches/score
///
/// Listing ids must be unique: price competitiveness tells a listing apart
/// from its peers by id.
async fn score_listings(
    state: web::Data<AppState>,
    req: web::Json<ScoreListingsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {}", errors);
        return validation_error(errors);
    }

    let ScoreListingsRequest {
        criteria,
        listings,
        limit,
    } = req.into_inner();

    let supplied = match Catalog::from_listings(listings) {
        Ok(catalog) => catalog,
        Err(CatalogError::DuplicateId(id)) => {
            tracing::info!("Rejected score request with duplicate listing id {}", id);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Duplicate listing id".to_string(),
                message: format!("Listing id '{}' appears more than once", id),
                status_code: 400,
            });
        }
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid listings".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let limit = resolve_limit(limit, state.default_limit, state.max_limit);
    let ranked = state
        .scorer
        .rank_top_matches(&criteria, supplied.listings(), limit);

    tracing::info!(
        "Scored {} supplied listings, returning {}",
        supplied.len(),
        ranked.len()
    );

    HttpResponse::Ok().json(Ranking::from_scored(&ranked, supplied.len()).into_response(limit))
}

/// Search the catalog
///
/// POST /api/v1/listings/search
async fn search_listings(
    state: web::Data<AppState>,
    req: web::Json<ListingFilter>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let listings: Vec<_> = state.catalog.search(&req).into_iter().cloned().collect();

    tracing::debug!("Search matched {} listings", listings.len());

    HttpResponse::Ok().json(SearchListingsResponse {
        total_results: listings.len(),
        listings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    fn test_state() -> AppState {
        let catalog = Catalog::from_json(
            r#"[
                { "id": "near", "price": 900, "type": "shared_bed", "city": "Cairo",
                  "coordinates": { "latitude": 30.0507, "longitude": 31.2086 } },
                { "id": "far", "price": 1300, "type": "shared_bed", "city": "Giza",
                  "coordinates": { "latitude": 30.2036, "longitude": 31.2086 } }
            ]"#,
        )
        .unwrap();

        AppState {
            catalog: Arc::new(catalog),
            scorer: Arc::new(MatchScorer::with_default_tables()),
            cache: Some(Arc::new(CacheManager::new(100, 60))),
            default_limit: 5,
            max_limit: 100,
        }
    }

    #[actix_web::test]
    async fn test_health_check_response() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.catalog_size, 2);
        assert_eq!(body.cache.map(|stats| stats.ttl_secs), Some(60));
    }

    #[actix_web::test]
    async fn test_cached_rank_mints_fresh_request_id() {
        let state = test_state();
        let cache = state.cache.clone().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let payload = serde_json::json!({
            "criteria": { "universityId": "cairo", "budget": 1000, "preferredType": "shared_bed" }
        });

        let first: RankMatchesResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/matches/rank")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        let second: RankMatchesResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/matches/rank")
                .set_json(&payload)
                .to_request(),
        )
        .await;

        assert_ne!(first.request_id, second.request_id);
        assert_eq!(first.matches, second.matches);
        assert_eq!(first.matches[0].listing.id, "near");
        assert_eq!(cache.stats().ttl_secs, 60);
        cache.invalidate_all();
    }

    #[actix_web::test]
    async fn test_score_rejects_duplicate_listing_ids() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let listings = |second_id: &str| {
            serde_json::json!([
                { "id": "a", "price": 600, "type": "shared_bed", "city": "Cairo" },
                { "id": second_id, "price": 1400, "type": "shared_bed", "city": "Cairo" }
            ])
        };
        let criteria = serde_json::json!({
            "universityId": "cairo", "budget": 1000, "preferredType": "shared_bed"
        });

        let distinct: RankMatchesResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/matches/score")
                .set_json(serde_json::json!({ "criteria": criteria, "listings": listings("b") }))
                .to_request(),
        )
        .await;
        let competitiveness: Vec<u8> = distinct
            .matches
            .iter()
            .map(|m| m.breakdown.price_competitiveness)
            .collect();
        assert_eq!(competitiveness, vec![100, 80]);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/matches/score")
                .set_json(serde_json::json!({ "criteria": criteria, "listings": listings("a") }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_rank_rejects_invalid_budget() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/rank")
            .set_json(serde_json::json!({
                "criteria": { "universityId": "cairo", "budget": -1, "preferredType": "shared_bed" }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
