use crate::models::{Listing, ListingFilter};

/// Check if a listing satisfies every constraint set on the filter
///
/// Unset constraints match everything. All requested amenities must be
/// present on the listing.
#[inline]
pub fn matches_filter(listing: &Listing, filter: &ListingFilter) -> bool {
    if let Some(city) = &filter.city {
        if &listing.city != city {
            return false;
        }
    }

    if let Some(min_price) = filter.min_price {
        if listing.price < min_price {
            return false;
        }
    }

    if let Some(max_price) = filter.max_price {
        if listing.price > max_price {
            return false;
        }
    }

    if let Some(housing_type) = filter.housing_type {
        if listing.housing_type != housing_type {
            return false;
        }
    }

    filter
        .amenities
        .iter()
        .all(|amenity| listing.has_amenity(amenity))
}

/// Narrow a catalog to the listings matching the filter, keeping catalog order
pub fn filter_listings<'a, 'f>(
    catalog: &'a [Listing],
    filter: &'f ListingFilter,
) -> impl Iterator<Item = &'a Listing> + 'f
where
    'a: 'f,
{
    catalog
        .iter()
        .filter(move |listing| matches_filter(listing, filter))
}
