//! HTML rendering of new listings.
//!
//! Listings are opaque, so the report shows every field as a row. A `title`
//! (or `name`) field becomes the heading and a `url` (or `link`) field
//! becomes the heading's link. All values are HTML-escaped.

use chrono::{DateTime, Utc};
use serde_json::Value;

use immo_ads_core::Listing;

const TITLE_FIELDS: &[&str] = &["title", "name"];
const LINK_FIELDS: &[&str] = &["url", "link"];

pub fn render_report(
    search_name: &str,
    listings: &[Listing],
    generated_at: DateTime<Utc>,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(search_name)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(search_name)));
    html.push_str(&format!(
        "<p>{} new listing{} ({})</p>\n",
        listings.len(),
        if listings.len() == 1 { "" } else { "s" },
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    for listing in listings {
        render_listing(&mut html, listing);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_listing(html: &mut String, listing: &Listing) {
    let heading = first_text(listing, TITLE_FIELDS)
        .unwrap_or_else(|| format!("Listing {}", display_value(listing.id())));
    let heading = escape(&heading);

    html.push_str("<div class=\"listing\">\n");
    match first_text(listing, LINK_FIELDS) {
        Some(link) => html.push_str(&format!(
            "<h2><a href=\"{}\">{}</a></h2>\n",
            escape(&link),
            heading
        )),
        None => html.push_str(&format!("<h2>{}</h2>\n", heading)),
    }

    html.push_str("<table>\n");
    for (field, value) in listing.fields() {
        if value.is_null() {
            continue;
        }
        html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            escape(field),
            escape(&display_value(value))
        ));
    }
    html.push_str("</table>\n</div>\n");
}

fn first_text(listing: &Listing, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| listing.get(f))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    fn listing(value: Value) -> Listing {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_report_has_title_and_count() {
        let html = render_report(
            "Flat in Springfield",
            &[listing(json!({"id": 1})), listing(json!({"id": 2}))],
            at(),
        );
        assert!(html.contains("<title>Flat in Springfield</title>"));
        assert!(html.contains("2 new listings (2024-03-01 08:30 UTC)"));
    }

    #[test]
    fn test_singular_count() {
        let html = render_report("x", &[listing(json!({"id": 1}))], at());
        assert!(html.contains("1 new listing ("));
    }

    #[test]
    fn test_title_and_link_make_heading() {
        let html = render_report(
            "x",
            &[listing(json!({
                "id": 7,
                "title": "Sunny loft",
                "url": "https://listings.example/7"
            }))],
            at(),
        );
        assert!(html.contains("<h2><a href=\"https://listings.example/7\">Sunny loft</a></h2>"));
    }

    #[test]
    fn test_heading_falls_back_to_id() {
        let html = render_report("x", &[listing(json!({"id": "abc"}))], at());
        assert!(html.contains("<h2>Listing abc</h2>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let html = render_report(
            "<script>",
            &[listing(json!({"id": 1, "title": "A & B <b>"}))],
            at(),
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("A &amp; B &lt;b&gt;"));
    }

    #[test]
    fn test_listings_keep_order_and_skip_nulls() {
        let html = render_report(
            "x",
            &[
                listing(json!({"id": 2, "title": "second-newest", "floor": null})),
                listing(json!({"id": 1, "title": "oldest", "rooms": 3})),
            ],
            at(),
        );
        let a = html.find("second-newest").unwrap();
        let b = html.find("oldest").unwrap();
        assert!(a < b);
        assert!(!html.contains("floor"));
        assert!(html.contains("<tr><th>rooms</th><td>3</td></tr>"));
    }
}
