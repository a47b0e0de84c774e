//! Static lookup tables consumed by the scorer.
//!
//! The tables are plain data injected into [`MatchScorer`](crate::core::MatchScorer)
//! so tests and deployments can swap them without touching scoring code.

use crate::models::{Coordinates, HousingType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading lookup tables or validating weights
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to read scoring tables from {path}: {source}")]
    ReadTables {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scoring tables: {0}")]
    ParseTables(#[from] toml::de::Error),

    #[error("{group} weights sum to {sum}, expected 1.0")]
    WeightsDoNotSumToOne { group: &'static str, sum: f64 },
}

/// Lookup tables for universities, type substitutions and tag resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTables {
    /// University id to campus coordinates
    #[serde(default)]
    pub universities: BTreeMap<String, Coordinates>,
    /// Preferred type to the types accepted in its place
    #[serde(default)]
    pub type_alternates: BTreeMap<HousingType, Vec<HousingType>>,
    /// Preference tag to the amenities that satisfy it
    #[serde(default)]
    pub tag_amenities: BTreeMap<String, Vec<String>>,
}

impl ScoringTables {
    /// Parse tables from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, ScoringError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load tables from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScoringError::ReadTables {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn university(&self, university_id: &str) -> Option<Coordinates> {
        self.universities.get(university_id).copied()
    }

    pub fn is_alternate(&self, preferred: HousingType, candidate: HousingType) -> bool {
        self.type_alternates
            .get(&preferred)
            .is_some_and(|alternates| alternates.contains(&candidate))
    }

    /// Resolve preference tags into the distinct amenities they require.
    ///
    /// Unknown tags and tags mapped to nothing contribute no requirement.
    pub fn required_amenities<'a, I>(&'a self, tags: I) -> BTreeSet<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter()
            .filter_map(|tag| self.tag_amenities.get(tag))
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

impl Default for ScoringTables {
    fn default() -> Self {
        let universities = [
            ("cairo", 30.0237, 31.2086),
            ("ain_shams", 30.0778, 31.2859),
            ("auc", 30.0192, 31.4994),
            ("alexandria", 31.2001, 29.9187),
            ("mansoura", 31.0364, 31.3807),
            ("tanta", 30.7865, 31.0004),
            ("assiut", 27.1783, 31.1859),
            ("qena", 26.1551, 32.716),
            ("sohag", 26.5569, 31.6948),
            ("zagazig", 30.5765, 31.5041),
        ]
        .into_iter()
        .map(|(id, lat, lon)| (id.to_string(), Coordinates::new(lat, lon)))
        .collect();

        let type_alternates = BTreeMap::from([
            (
                HousingType::SharedBed,
                vec![HousingType::PrivateRoom, HousingType::FullApartment],
            ),
            (
                HousingType::PrivateRoom,
                vec![HousingType::SharedBed, HousingType::FullApartment],
            ),
            (
                HousingType::FullApartment,
                vec![HousingType::PrivateRoom, HousingType::SharedBed],
            ),
        ]);

        let tag_table: [(&str, &[&str]); 6] = [
            ("near_university", &[]),
            ("cheap_price", &[]),
            ("safety", &["security"]),
            ("quiet", &[]),
            ("strong_wifi", &["wifi"]),
            ("furnished", &[]),
        ];
        let tag_amenities = tag_table
            .into_iter()
            .map(|(tag, amenities)| {
                (
                    tag.to_string(),
                    amenities.iter().map(|a| a.to_string()).collect(),
                )
            })
            .collect();

        Self {
            universities,
            type_alternates,
            tag_amenities,
        }
    }
}
