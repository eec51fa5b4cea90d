use crate::controller::Tab;
use crate::domain::{FilterCriteria, Listing};
use crate::templates::components::filter_form;
use crate::templates::{desktop_layout, listing_card};
use maud::{html, Markup};

pub struct ListPageVm<'a> {
    pub tab: Tab,
    pub loading: bool,
    pub criteria: &'a FilterCriteria,
    pub listings: &'a [Listing],
    pub total: usize,
}

pub fn list_page(vm: &ListPageVm) -> Markup {
    desktop_layout(
        "Apartments near campus",
        vm.tab,
        &vm.criteria.to_query(),
        html! {
            div class="layout" {
                (filter_form(vm.criteria, "/"))

                section class="results" {
                    @if vm.loading {
                        p class="loading" { "Loading apartments..." }
                    } @else {
                        p class="result-count" {
                            "Showing " (vm.listings.len()) " of " (vm.total) " apartments"
                        }
                        @if vm.listings.is_empty() {
                            div class="empty" {
                                p { "No apartments match your filters." }
                                a href="/filters/clear" { "Clear filters" }
                            }
                        } @else {
                            div class="listing-grid" {
                                @for listing in vm.listings {
                                    (listing_card(listing))
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
