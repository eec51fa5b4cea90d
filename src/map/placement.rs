// src/map/placement.rs

use crate::domain::{LatLng, Listing, ListingId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::f64::consts::TAU;

/// Degrees per mile, roughly, at campus latitude.
const LAT_DEGREES_PER_MILE: f64 = 0.014;
const LNG_DEGREES_PER_MILE: f64 = 0.018;
const FALLBACK_DISTANCE_MILES: f64 = 1.0;

/// Where a listing's marker goes: its own coordinates when it has them,
/// otherwise a point on the circle of radius `distance` around `reference`.
///
/// The bearing is drawn from an RNG seeded with the listing id, so a listing
/// without coordinates lands in the same spot on every rebuild.
pub fn position_for(listing: &Listing, reference: LatLng) -> LatLng {
    if let Some(coords) = listing.coordinates {
        return coords;
    }

    let miles = listing.distance.unwrap_or(FALLBACK_DISTANCE_MILES);
    let angle = StdRng::seed_from_u64(seed_for(&listing.id)).gen_range(0.0..TAU);

    LatLng::new(
        reference.lat + miles * LAT_DEGREES_PER_MILE * angle.cos(),
        reference.lng + miles * LNG_DEGREES_PER_MILE * angle.sin(),
    )
}

fn seed_for(id: &ListingId) -> u64 {
    let digest = Sha256::digest(id.as_str().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawListing;
    use crate::map::REFERENCE_POINT;
    use serde_json::json;

    fn listing(id: &str, body: serde_json::Value) -> Listing {
        Listing::normalize(RawListing::from_value(id, body))
    }

    fn ellipse_radius(p: LatLng) -> f64 {
        let dlat = (p.lat - REFERENCE_POINT.lat) / LAT_DEGREES_PER_MILE;
        let dlng = (p.lng - REFERENCE_POINT.lng) / LNG_DEGREES_PER_MILE;
        (dlat * dlat + dlng * dlng).sqrt()
    }

    #[test]
    fn real_coordinates_win() {
        let l = listing("a", json!({ "coordinates": [40.81, -77.87], "distance": 3 }));
        assert_eq!(position_for(&l, REFERENCE_POINT), LatLng::new(40.81, -77.87));
    }

    #[test]
    fn synthesized_point_sits_at_listing_distance() {
        let l = listing("b", json!({ "distance": 0.5 }));
        let p = position_for(&l, REFERENCE_POINT);
        assert!((ellipse_radius(p) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_distance_uses_one_mile() {
        let l = listing("c", json!({}));
        let p = position_for(&l, REFERENCE_POINT);
        assert!((ellipse_radius(p) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn placement_is_stable_per_id() {
        let a = listing("same-id", json!({ "distance": 2 }));
        let b = listing("same-id", json!({ "distance": 2 }));
        let other = listing("other-id", json!({ "distance": 2 }));

        assert_eq!(position_for(&a, REFERENCE_POINT), position_for(&b, REFERENCE_POINT));
        assert_ne!(position_for(&a, REFERENCE_POINT), position_for(&other, REFERENCE_POINT));
    }
}
