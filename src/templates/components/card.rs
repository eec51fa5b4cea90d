use crate::domain::Listing;
use crate::templates::{encode_id, rating_stars};
use maud::{html, Markup};

pub fn listing_card(listing: &Listing) -> Markup {
    html! {
        article class="listing-card" data-id=(listing.id) {
            @if listing.featured {
                span class="badge featured" { "Featured" }
            }
            img src=(listing.image) alt=(listing.name);
            h3 class="listing-name" { (listing.name) }
            p class="listing-address" { (listing.address) }
            p class="listing-rent" { (listing.rent_label()) }
            ul class="listing-facts" {
                li { (beds_label(listing)) }
                li { (baths_label(listing)) }
                li { (listing.distance_label()) }
            }
            (rating_stars(listing.rating, listing.reviews))
            p class="listing-available" { "Available: " (listing.available) }
            @if !listing.amenities.is_empty() {
                ul class="amenities" {
                    @for amenity in &listing.amenities {
                        li class="amenity" { (amenity) }
                    }
                }
            }
            form method="post" action={ "/map/center?id=" (encode_id(listing.id.as_str())) } {
                button type="submit" { "View on map" }
            }
        }
    }
}

fn beds_label(listing: &Listing) -> String {
    match listing.bedrooms {
        Some(0) => "Studio".to_string(),
        Some(1) => "1 bed".to_string(),
        Some(n) => format!("{n} beds"),
        None => "Beds: ?".to_string(),
    }
}

fn baths_label(listing: &Listing) -> String {
    match listing.bathrooms {
        Some(n) if n == 1.0 => "1 bath".to_string(),
        Some(n) => format!("{n} baths"),
        None => "Baths: ?".to_string(),
    }
}
