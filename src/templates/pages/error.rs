use crate::templates::components::error_body;
use maud::{html, Markup, DOCTYPE};

/// Standalone error page. Does not use the tabbed layout so it renders even
/// when the view state is unavailable.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body { (error_body(status, message)) }
        }
    }
}
