use super::info_block::FREE_PRICE;

/// Ratings that mark an event as suitable for children or restricted to
/// adults. Literal tokens, not numeric comparison; the sources emit a fixed
/// vocabulary.
const CHILD_RATINGS: [&str; 3] = ["0+", "6+", "12+"];
const ADULT_RATINGS: [&str; 2] = ["16+", "18+"];

const CLOSING_TAG: &str = "Событие месяца";

/// Which source's tag vocabulary to apply. The culture portal ships its own
/// tags and never goes through the generator.
#[derive(Clone, Copy, Debug)]
pub enum TagStyle {
    Afisha,
    Mts,
}

/// Builds the ordered tag list for a record. Order is significant and is
/// exactly the generation order; tags are never sorted or deduplicated.
pub fn generate(
    style: TagStyle,
    age_limit: Option<&str>,
    price: Option<&str>,
    detail_url: &str,
) -> Vec<String> {
    let mut tags: Vec<String> = match style {
        TagStyle::Afisha => vec!["Театр".to_string(), "Культура".to_string()],
        TagStyle::Mts => vec!["Культура".to_string(), "Искусство".to_string()],
    };

    if let Some(age) = age_limit {
        if CHILD_RATINGS.contains(&age) {
            tags.push("Для детей".to_string());
        } else if ADULT_RATINGS.contains(&age) {
            tags.push("Для взрослых".to_string());
        }
    }

    if matches!(style, TagStyle::Mts) {
        let url = detail_url.to_lowercase();
        if url.contains("theater") {
            tags.push("Театр".to_string());
        } else if url.contains("concert") {
            tags.push("Концерт".to_string());
        } else if url.contains("exhibition") {
            tags.push("Выставка".to_string());
        }
    }

    if let Some(price) = price {
        if is_free(price) {
            tags.push(FREE_PRICE.to_string());
        } else if !price.trim().is_empty() {
            tags.push("Платно".to_string());
        }
    }

    tags.push(CLOSING_TAG.to_string());
    tags
}

fn is_free(price: &str) -> bool {
    let lowered = price.to_lowercase();
    lowered.contains("бесплатно") || lowered.contains("free") || lowered.trim() == "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adult_rating_and_free_price_keep_their_relative_order() {
        let tags = generate(TagStyle::Afisha, Some("18+"), Some("free"), "");
        let adult = tags.iter().position(|t| t == "Для взрослых").unwrap();
        let free = tags.iter().position(|t| t == FREE_PRICE).unwrap();
        assert!(adult < free);
        assert_eq!(
            tags,
            vec!["Театр", "Культура", "Для взрослых", FREE_PRICE, CLOSING_TAG]
        );
    }

    #[test]
    fn child_ratings_tag_for_children() {
        for rating in CHILD_RATINGS {
            let tags = generate(TagStyle::Afisha, Some(rating), None, "");
            assert!(tags.contains(&"Для детей".to_string()), "{rating}");
        }
    }

    #[test]
    fn unknown_rating_adds_no_audience_tag() {
        let tags = generate(TagStyle::Afisha, Some("14+"), None, "");
        assert!(!tags.iter().any(|t| t == "Для детей" || t == "Для взрослых"));
    }

    #[test]
    fn mts_derives_category_from_the_detail_url() {
        let tags = generate(
            TagStyle::Mts,
            None,
            None,
            "https://live.example.ru/tula/collections/theater/123",
        );
        assert_eq!(tags, vec!["Культура", "Искусство", "Театр", CLOSING_TAG]);

        let tags = generate(TagStyle::Mts, None, None, "https://x.ru/concert/9");
        assert!(tags.contains(&"Концерт".to_string()));

        let tags = generate(TagStyle::Mts, None, None, "https://x.ru/exhibition/2");
        assert!(tags.contains(&"Выставка".to_string()));
    }

    #[test]
    fn priced_events_are_tagged_paid() {
        let tags = generate(TagStyle::Mts, None, Some("Цена не указана"), "");
        assert!(tags.contains(&"Платно".to_string()));

        let tags = generate(TagStyle::Afisha, None, Some("от 500 руб"), "");
        assert!(tags.contains(&"Платно".to_string()));
    }

    #[test]
    fn free_cues_are_tagged_free() {
        for price in ["Бесплатно", "вход бесплатно", "Free", "0"] {
            let tags = generate(TagStyle::Afisha, None, Some(price), "");
            assert!(tags.contains(&FREE_PRICE.to_string()), "{price}");
            assert!(!tags.contains(&"Платно".to_string()), "{price}");
        }
    }

    #[test]
    fn absent_price_adds_neither_tag() {
        let tags = generate(TagStyle::Afisha, None, None, "");
        assert_eq!(tags, vec!["Театр", "Культура", CLOSING_TAG]);
    }

    #[test]
    fn closing_tag_is_always_last() {
        let tags = generate(TagStyle::Mts, Some("6+"), Some("100 руб"), "https://x.ru/theater");
        assert_eq!(tags.last().map(String::as_str), Some(CLOSING_TAG));
    }
}
