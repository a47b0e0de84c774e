use crate::core::filters::filter_listings;
use crate::models::{Listing, ListingFilter};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur while loading the listing catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid listing {id}: {errors}")]
    InvalidListing {
        id: String,
        errors: validator::ValidationErrors,
    },

    #[error("Duplicate listing id: {0}")]
    DuplicateId(String),
}

/// Read-only set of listings the service ranks against
///
/// Loaded once at startup from a JSON array of listings. The catalog is never
/// mutated afterwards, so ranked results for a given request stay valid for
/// the life of the process.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    /// Build a catalog, rejecting invalid listings and duplicate ids
    pub fn from_listings(listings: Vec<Listing>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(listings.len());

        for listing in &listings {
            listing
                .validate()
                .map_err(|errors| CatalogError::InvalidListing {
                    id: listing.id.clone(),
                    errors,
                })?;

            if !seen.insert(listing.id.as_str()) {
                return Err(CatalogError::DuplicateId(listing.id.clone()));
            }
        }

        Ok(Self { listings })
    }

    /// Parse a catalog from a JSON array
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let listings: Vec<Listing> = serde_json::from_str(raw)?;
        Self::from_listings(listings)
    }

    /// Load a catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json(&raw)?;
        tracing::info!("Loaded {} listings from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Listings matching every constraint of the filter, in catalog order
    pub fn search(&self, filter: &ListingFilter) -> Vec<&Listing> {
        filter_listings(&self.listings, filter).collect()
    }
}
