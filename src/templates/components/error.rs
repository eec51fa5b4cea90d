use maud::{html, Markup};

pub fn error_body(status: u16, message: &str) -> Markup {
    html! {
        section class="error" {
            h1 { "Error " (status) }
            p { (message) }
            p { a href="/" { "← Back to listings" } }
        }
    }
}
