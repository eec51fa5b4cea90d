use maud::{html, Markup};

/// Full, half and empty star counts for a 0-5 rating. Always sums to 5.
pub fn star_counts(rating: f64) -> (usize, bool, usize) {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let half = full < 5 && rating.fract() >= 0.5;
    let empty = 5 - full - usize::from(half);
    (full, half, empty)
}

pub fn rating_stars(rating: Option<f64>, reviews: u32) -> Markup {
    let Some(rating) = rating else {
        return html! { span class="rating none" { "No ratings yet" } };
    };
    let (full, half, empty) = star_counts(rating);

    html! {
        span class="rating" title=(format!("{rating:.1} out of 5")) {
            @for _ in 0..full { span class="star full" { "★" } }
            @if half { span class="star half" { "★" } }
            @for _ in 0..empty { span class="star empty" { "☆" } }
            " "
            span class="reviews" { "(" (reviews) " reviews)" }
        }
    }
}
