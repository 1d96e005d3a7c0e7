/// Sentinel stored for any price that turns out to be free of charge.
pub const FREE_PRICE: &str = "Бесплатно";

/// One entry of a detail-page info block. `icon_only` marks entries whose
/// markup is an icon glyph (accessibility badges and the like), which carry
/// no classifiable text.
#[derive(Clone, Debug)]
pub struct InfoFragment {
    pub text: String,
    pub icon_only: bool,
}

impl InfoFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_only: false,
        }
    }

    pub fn icon(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_only: true,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct InfoFields {
    pub age_limit: Option<String>,
    pub date: Option<String>,
    pub price: Option<String>,
}

/// Heuristic assignment of loosely-typed info fragments to fields.
///
/// The rules are ordered and the order is load-bearing: a `+` outranks a
/// currency token, which in turn outranks the digit test that marks a date.
/// This is an approximation of what the info block means, not a grammar for
/// it; later fragments overwrite earlier ones.
pub fn classify(items: &[InfoFragment]) -> InfoFields {
    let mut fields = InfoFields::default();

    for item in items {
        if item.icon_only {
            continue;
        }
        let text = item.text.trim();
        if text.is_empty() {
            continue;
        }

        if text.contains('+') {
            fields.age_limit = Some(text.to_string());
        } else if is_price(text) {
            fields.price = Some(normalize_price(text));
        } else if is_date(text) {
            fields.date = Some(render_date(text));
        }
    }

    if fields.date.is_none() {
        if let Some(first) = items.iter().find(|item| !item.icon_only) {
            let text = first.text.trim();
            if !text.is_empty() && !text.contains('+') && !is_price(text) {
                fields.date = Some(text.to_string());
            }
        }
    }

    fields
}

fn is_price(text: &str) -> bool {
    text.contains("руб") || text.contains('₽') || text.contains(FREE_PRICE)
}

fn normalize_price(text: &str) -> String {
    if text.contains(FREE_PRICE) {
        return FREE_PRICE.to_string();
    }
    text.strip_prefix("от").unwrap_or(text).trim().to_string()
}

fn is_date(text: &str) -> bool {
    text.contains("С ") || text.contains(" по ") || text.chars().any(|c| c.is_ascii_digit())
}

/// `"С 1 марта по 15 апреля"` reads better as a plain range.
fn render_date(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("С ") {
        if let Some((start, end)) = rest.split_once(" по ") {
            return format!("{} - {}", start.trim(), end.trim());
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<InfoFragment> {
        items.iter().map(|t| InfoFragment::text(*t)).collect()
    }

    #[test]
    fn assigns_age_price_and_date_by_rule_order() {
        let fields = classify(&texts(&["12+", "от 500 руб", "15 марта"]));
        assert_eq!(fields.age_limit.as_deref(), Some("12+"));
        assert_eq!(fields.price.as_deref(), Some("500 руб"));
        assert_eq!(fields.date.as_deref(), Some("15 марта"));
    }

    #[test]
    fn free_of_charge_normalizes_to_the_sentinel() {
        let fields = classify(&texts(&["Бесплатно"]));
        assert_eq!(fields.price.as_deref(), Some(FREE_PRICE));
        assert_eq!(fields.age_limit, None);
        assert_eq!(fields.date, None);
    }

    #[test]
    fn from_to_range_renders_as_a_dash() {
        let fields = classify(&texts(&["С 1 марта по 15 апреля"]));
        assert_eq!(fields.date.as_deref(), Some("1 марта - 15 апреля"));
    }

    #[test]
    fn ruble_sign_counts_as_a_price() {
        let fields = classify(&texts(&["800 ₽"]));
        assert_eq!(fields.price.as_deref(), Some("800 ₽"));
        assert_eq!(fields.date, None);
    }

    #[test]
    fn icon_fragments_are_skipped_entirely() {
        let items = vec![
            InfoFragment::icon("доступная среда"),
            InfoFragment::text("6+"),
        ];
        let fields = classify(&items);
        assert_eq!(fields.age_limit.as_deref(), Some("6+"));
        assert_eq!(fields.date, None, "icon must not become the date fallback");
    }

    #[test]
    fn fallback_takes_first_non_icon_fragment_as_date() {
        let items = vec![
            InfoFragment::icon("badge"),
            InfoFragment::text("Премьера сезона"),
        ];
        let fields = classify(&items);
        assert_eq!(fields.date.as_deref(), Some("Премьера сезона"));
    }

    #[test]
    fn fallback_refuses_price_like_fragments() {
        let fields = classify(&texts(&["500 руб"]));
        assert_eq!(fields.price.as_deref(), Some("500 руб"));
        assert_eq!(fields.date, None);
    }

    #[test]
    fn later_fragments_overwrite_earlier_assignments() {
        let fields = classify(&texts(&["15 марта", "16 марта"]));
        assert_eq!(fields.date.as_deref(), Some("16 марта"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(classify(&[]), InfoFields::default());
    }
}
