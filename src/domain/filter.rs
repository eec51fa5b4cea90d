// src/domain/filter.rs

use crate::domain::listing::Listing;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "distance")]
    Distance,
    #[serde(rename = "rent-low")]
    RentLow,
    #[serde(rename = "rent-high")]
    RentHigh,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Distance, SortBy::RentLow, SortBy::RentHigh];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Distance => "distance",
            SortBy::RentLow => "rent-low",
            SortBy::RentHigh => "rent-high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Distance => "Distance to campus",
            SortBy::RentLow => "Rent: low to high",
            SortBy::RentHigh => "Rent: high to low",
        }
    }

    /// Unknown values fall back to the default ordering.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim() {
            "rent-low" => SortBy::RentLow,
            "rent-high" => SortBy::RentHigh,
            _ => SortBy::Distance,
        }
    }
}

/// User-supplied constraints plus the sort order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterCriteria {
    pub search: String,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    pub bedrooms: Option<u32>,
    pub max_distance: Option<f64>,
    pub sort_by: SortBy,
}

/// Form field names, as used by the filter inputs and the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    MinRent,
    MaxRent,
    Bedrooms,
    MaxDistance,
    SortBy,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Search,
        FilterField::MinRent,
        FilterField::MaxRent,
        FilterField::Bedrooms,
        FilterField::MaxDistance,
        FilterField::SortBy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterField::Search => "search",
            FilterField::MinRent => "minRent",
            FilterField::MaxRent => "maxRent",
            FilterField::Bedrooms => "bedrooms",
            FilterField::MaxDistance => "maxDistance",
            FilterField::SortBy => "sortBy",
        }
    }
}

impl FilterCriteria {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Applies one form input. Blank input clears the field; input that does
    /// not parse is treated the same way.
    pub fn set_field(&mut self, field: FilterField, value: &str) {
        match field {
            FilterField::Search => self.search = value.to_string(),
            FilterField::MinRent => self.min_rent = parse_bound(field, value),
            FilterField::MaxRent => self.max_rent = parse_bound(field, value),
            FilterField::Bedrooms => self.bedrooms = parse_input(field, value),
            FilterField::MaxDistance => self.max_distance = parse_bound(field, value),
            FilterField::SortBy => self.sort_by = SortBy::parse_or_default(value),
        }
    }

    /// Builds criteria from decoded query parameters. Unknown keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut criteria = Self::default();
        for field in FilterField::ALL {
            if let Some(value) = params.get(field.name()) {
                criteria.set_field(field, value);
            }
        }
        criteria
    }

    /// Renders the non-default fields back into a query string (without `?`).
    pub fn to_query(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());

        if !self.search.is_empty() {
            ser.append_pair(FilterField::Search.name(), &self.search);
        }
        let numbers = [
            (FilterField::MinRent, self.min_rent),
            (FilterField::MaxRent, self.max_rent),
            (FilterField::Bedrooms, self.bedrooms.map(f64::from)),
            (FilterField::MaxDistance, self.max_distance),
        ];
        for (field, value) in numbers {
            if let Some(v) = value {
                ser.append_pair(field.name(), &v.to_string());
            }
        }
        if self.sort_by != SortBy::default() {
            ser.append_pair(FilterField::SortBy.name(), self.sort_by.as_str());
        }

        ser.finish()
    }

    /// Whether a listing passes every active constraint.
    ///
    /// Unknown rent is excluded by a rent floor but kept under a rent ceiling.
    /// Unknown distance and unknown bedroom counts never satisfy their filters.
    pub fn matches(&self, listing: &Listing) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !listing.name.to_lowercase().contains(&needle)
            && !listing.address.to_lowercase().contains(&needle)
        {
            return false;
        }

        if let Some(min) = self.min_rent {
            match listing.rent {
                Some(rent) if rent >= min => {}
                _ => return false,
            }
        }

        if let (Some(max), Some(rent)) = (self.max_rent, listing.rent) {
            if rent > max {
                return false;
            }
        }

        if let Some(beds) = self.bedrooms {
            if listing.bedrooms != Some(beds) {
                return false;
            }
        }

        if let Some(max) = self.max_distance {
            match listing.distance {
                Some(d) if d <= max => {}
                _ => return false,
            }
        }

        true
    }

    /// Total order for the active sort key. Missing values always go last,
    /// whichever direction the key sorts in.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self.sort_by {
            SortBy::Distance => nulls_last(a.distance, b.distance, |x, y| x.total_cmp(&y)),
            SortBy::RentLow => nulls_last(a.rent, b.rent, |x, y| x.total_cmp(&y)),
            SortBy::RentHigh => nulls_last(a.rent, b.rent, |x, y| y.total_cmp(&x)),
        }
    }
}

fn nulls_last<F>(a: Option<f64>, b: Option<f64>, cmp: F) -> Ordering
where
    F: Fn(f64, f64) -> Ordering,
{
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => cmp(x, y),
    }
}

fn parse_input<T: FromStr>(field: FilterField, value: &str) -> Option<T> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed.parse().ok();
    if parsed.is_none() {
        debug!(field = field.name(), value = trimmed, "ignoring unparsable filter input");
    }
    parsed
}

/// Rent and distance bounds must be finite and non-negative.
fn parse_bound(field: FilterField, value: &str) -> Option<f64> {
    let bound = parse_input::<f64>(field, value)?;
    if bound.is_finite() && bound >= 0.0 {
        Some(bound)
    } else {
        debug!(field = field.name(), value = value.trim(), "ignoring out-of-range filter input");
        None
    }
}

/// Filters and orders listings. Pure: the input is left untouched and equal
/// keys keep their input order.
pub fn apply(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    let mut out: Vec<Listing> = listings
        .iter()
        .filter(|l| criteria.matches(l))
        .cloned()
        .collect();

    // sort_by is stable
    out.sort_by(|a, b| criteria.compare(a, b));
    out
}
