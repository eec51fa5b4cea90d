use crate::domain::Listing;
use crate::templates::{encode_id, rating_stars};
use maud::{html, Markup};

/// Full detail panel for the selected listing.
pub fn detail_panel(listing: &Listing) -> Markup {
    html! {
        aside class="panel detail" data-id=(listing.id) {
            form method="post" action="/map/detail/close" {
                button type="submit" class="close" aria-label="Close" { "×" }
            }
            @if listing.featured {
                span class="badge featured" { "Featured" }
            }
            img src=(listing.image) alt=(listing.name);
            h2 { (listing.name) }
            p { (listing.address) }
            p class="listing-rent" { (listing.rent_label()) }
            (rating_stars(listing.rating, listing.reviews))
            dl {
                dt { "Bedrooms" } dd { (listing.bedrooms_label()) }
                dt { "Bathrooms" } dd { (listing.bathrooms.map(|b| b.to_string()).unwrap_or_else(|| "?".into())) }
                dt { "Distance" } dd { (listing.distance_label()) }
                dt { "Available" } dd { (listing.available) }
            }
            @if !listing.amenities.is_empty() {
                h3 { "Amenities" }
                ul class="amenities" {
                    @for amenity in &listing.amenities {
                        li class="amenity" { (amenity) }
                    }
                }
            }
        }
    }
}

/// Other listings like the selected one; each entry selects its listing.
pub fn similar_panel(similar: &[&Listing]) -> Markup {
    html! {
        section class="panel similar" {
            h4 { "Similar Apartments" }
            @if similar.is_empty() {
                p class="empty" { "No similar apartments found" }
            } @else {
                ul {
                    @for listing in similar {
                        li class="similar-item" data-id=(listing.id) {
                            form method="post" action={ "/map/details?id=" (encode_id(listing.id.as_str())) } {
                                button type="submit" {
                                    span.marker-badge.featured[listing.featured] { (listing.bedrooms_label()) }
                                    span class="similar-name" { (listing.name) }
                                    span class="similar-facts" {
                                        (listing.rent_label()) " · " (listing.distance_label())
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Compact preview shown while hovering a marker.
pub fn hover_panel(listing: &Listing) -> Markup {
    html! {
        aside class="panel hover" data-id=(listing.id) {
            form method="post" action="/map/hover/close" {
                button type="submit" class="close" aria-label="Close" { "×" }
            }
            h3 { (listing.name) }
            p { (listing.address) }
            p class="listing-rent" { (listing.rent_label()) }
            form method="post" action={ "/map/details?id=" (encode_id(listing.id.as_str())) } {
                button type="submit" { "View Details" }
            }
        }
    }
}
