use crate::controller::Tab;
use maud::{html, Markup, DOCTYPE};

/// Page shell with the header and the list/map tab switch. `query` is the
/// current filter query so switching tabs keeps the filters.
pub fn desktop_layout(title: &str, tab: Tab, query: &str, content: Markup) -> Markup {
    let suffix = if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    };

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
            }
            body class="bg-gradient-to-b from-gray-50 to-blue-50 min-h-screen" {
                header class="bg-blue-900 text-white py-6" {
                    div class="container mx-auto px-4" {
                        h1 class="text-3xl font-bold" { "Penn State Apartment Finder" }
                        p class="text-blue-100" {
                            "Browse apartments near campus with our easy-to-use search tools"
                        }
                    }
                }
                nav class="tabs container mx-auto px-4" {
                    a.tab.active[tab == Tab::List] href={ "/" (suffix) } {
                        "List View"
                    }
                    a.tab.active[tab == Tab::Map] href={ "/map" (suffix) } {
                        "Map View"
                    }
                }
                main class="container mx-auto px-4" {
                    (content)
                }
            }
        }
    }
}
