//! Display helpers derived from a score's numeric contract.
//!
//! These are pure lookups; the text is English placeholder copy and the
//! class names are utility CSS classes consumed by the front-end.

use crate::models::{OwnerBadge, ScoredListing, TrustStats};
use serde::{Deserialize, Serialize};

/// Coarse quality band for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Poor,
    Weak,
    Acceptable,
    VeryGood,
    Excellent,
}

impl MatchTier {
    /// ≥90 Excellent, ≥75 VeryGood, ≥60 Acceptable, ≥40 Weak, else Poor
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => MatchTier::Excellent,
            75..=89 => MatchTier::VeryGood,
            60..=74 => MatchTier::Acceptable,
            40..=59 => MatchTier::Weak,
            _ => MatchTier::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Excellent => "Excellent",
            MatchTier::VeryGood => "Very good",
            MatchTier::Acceptable => "Acceptable",
            MatchTier::Weak => "Weak",
            MatchTier::Poor => "Poor",
        }
    }

    pub fn text_class(&self) -> &'static str {
        match self {
            MatchTier::Excellent => "text-green-500",
            MatchTier::VeryGood => "text-emerald-500",
            MatchTier::Acceptable => "text-yellow-500",
            MatchTier::Weak => "text-orange-500",
            MatchTier::Poor => "text-red-500",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            MatchTier::Excellent => "bg-green-100 text-green-700",
            MatchTier::VeryGood => "bg-emerald-100 text-emerald-700",
            MatchTier::Acceptable => "bg-yellow-100 text-yellow-700",
            MatchTier::Weak => "bg-orange-100 text-orange-700",
            MatchTier::Poor => "bg-red-100 text-red-700",
        }
    }
}

/// One-line summary of why a listing was recommended
pub fn recommendation_text(scored: &ScoredListing<'_>) -> String {
    let mut parts = Vec::with_capacity(3);

    parts.push(match scored.final_score {
        90.. => "Excellent match",
        75..=89 => "Very good match",
        60..=74 => "Acceptable match",
        _ => "Weak match",
    });

    if scored.trust_score >= 90 {
        parts.push("Fully trusted owner");
    } else if scored.trust_score >= 75 {
        parts.push("Trusted owner");
    }

    if scored.preference_score >= 80 {
        parts.push("Strongly fits your preferences");
    }

    parts.join(" • ")
}

/// Owner reputation chip shown next to a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerBadgeView {
    pub text: String,
    pub color: String,
    pub icon: String,
}

impl OwnerBadgeView {
    fn new(text: &str, color: &str, icon: &str) -> Self {
        Self {
            text: text.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Owners without reviews are always shown as new, whatever their badge
pub fn owner_badge(stats: Option<&TrustStats>) -> OwnerBadgeView {
    let new_owner = || OwnerBadgeView::new("New owner", "bg-gray-100 text-gray-600", "User");

    match stats {
        Some(stats) if stats.total_reviews > 0 => match stats.badge {
            OwnerBadge::Trusted => {
                OwnerBadgeView::new("Fully trusted owner", "bg-green-100 text-green-700", "BadgeCheck")
            }
            OwnerBadge::Verified => {
                OwnerBadgeView::new("Verified owner", "bg-blue-100 text-blue-700", "CheckCircle")
            }
            OwnerBadge::Flagged => OwnerBadgeView::new(
                "Warning: negative reviews",
                "bg-red-100 text-red-700",
                "AlertTriangle",
            ),
            OwnerBadge::New => new_owner(),
        },
        _ => new_owner(),
    }
}
