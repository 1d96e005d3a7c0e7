use scraper::{ElementRef, Selector};

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| {
            let cleaned = inner_text(node);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .flatten()
}

pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

pub fn absolute_url(base: &str, href: Option<String>) -> Option<String> {
    let href = href?;
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href);
    }
    let base_url = reqwest::Url::parse(base).ok()?;
    base_url.join(&href).ok().map(|u| u.to_string())
}

/// Replaces the non-breaking-space variants the sources sprinkle through
/// venue and price text.
pub fn plain_spaces(input: &str) -> String {
    input.replace('\u{a0}', " ").replace("&nbsp;", " ")
}
