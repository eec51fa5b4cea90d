use crate::domain::{FilterCriteria, FilterField, SortBy};
use maud::{html, Markup};

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Filter sidebar. Submits with GET to `action` so filters live in the URL.
pub fn filter_form(criteria: &FilterCriteria, action: &str) -> Markup {
    let bedrooms = criteria.bedrooms.map(|b| b.to_string()).unwrap_or_default();

    html! {
        form class="filters" method="get" action=(action) {
            h2 { "Filters" }
            label {
                "Search"
                input type="text" name=(FilterField::Search.name()) value=(criteria.search)
                    placeholder="Search by location, property name, or features...";
            }
            label {
                "Min rent"
                input type="number" min="0" name=(FilterField::MinRent.name()) value=(number(criteria.min_rent));
            }
            label {
                "Max rent"
                input type="number" min="0" name=(FilterField::MaxRent.name()) value=(number(criteria.max_rent));
            }
            label {
                "Bedrooms"
                select name=(FilterField::Bedrooms.name()) {
                    option value="" selected[bedrooms.is_empty()] { "Any" }
                    @for n in ["0", "1", "2", "3", "4"] {
                        option value=(n) selected[bedrooms == n] {
                            @if n == "0" { "Studio" } @else { (n) }
                        }
                    }
                }
            }
            label {
                "Max distance (miles)"
                input type="number" min="0" step="0.1" name=(FilterField::MaxDistance.name())
                    value=(number(criteria.max_distance));
            }
            label {
                "Sort by"
                select name=(FilterField::SortBy.name()) {
                    @for sort in SortBy::ALL {
                        option value=(sort.as_str()) selected[criteria.sort_by == sort] { (sort.label()) }
                    }
                }
            }
            button type="submit" { "Apply" }
            a class="clear-filters" href="/filters/clear" { "Clear filters" }
        }
    }
}
