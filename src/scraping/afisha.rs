use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{base, dates, tags, EventSource};
use crate::models::{CardStub, EventRecord};

const BASE_URL: &str = "https://tula.afishagoroda.ru";
const THEATER_URL: &str = "https://tula.afishagoroda.ru/events/teatr";
const SOURCE_ID: &str = "afisha";
const SOURCE_NAME: &str = "Афиша города";

/// Gallery links beyond this count are ignored; the detail pages repeat the
/// same photos in several resolutions further down.
const GALLERY_LIMIT: usize = 3;

static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.events-elem").expect("afisha card selector"));
static CARD_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.title").expect("afisha title selector"));
static INFO_LINE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.info-line").expect("afisha info line"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.img").expect("afisha image"));
static DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.date-start").expect("afisha date"));
static PLACE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.place").expect("afisha place"));
static PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.price").expect("afisha price"));
static TICKET_BTN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a.btn[target="_blank"]"#).expect("afisha ticket button"));
static YATICKET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a.js-yaticket-button[target="_blank"]"#).expect("afisha yaticket button")
});
static SPAN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span").expect("span selector"));
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.redactor.content").expect("afisha description"));
static DESCRIPTION_BOTTOM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.redactor.content-bottom").expect("afisha description tail"));
static GALLERY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[data-fancybox="events-gallery"]"#).expect("afisha gallery selector")
});

pub struct Afisha;

impl EventSource for Afisha {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn base_url(&self) -> &'static str {
        BASE_URL
    }

    fn listing_url(&self, page: u32) -> Option<String> {
        (page == 1).then(|| THEATER_URL.to_string())
    }

    fn list_cards(&self, html: &str) -> Vec<CardStub> {
        let document = Html::parse_document(html);
        let mut stubs = Vec::new();
        for card in document.select(&CARD_SELECTOR) {
            let Some(link) = card.select(&CARD_TITLE_SELECTOR).next() else {
                continue;
            };
            let title = base::inner_text(link);
            let detail_url =
                base::absolute_url(BASE_URL, link.value().attr("href").map(str::to_string));
            match (title.is_empty(), detail_url) {
                (false, Some(url)) => stubs.push(CardStub::new(title, url)),
                _ => continue,
            }
        }
        stubs
    }

    fn extract_detail(&self, html: &str, stub: &CardStub) -> Option<EventRecord> {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let mut record = EventRecord::new(stub.title.clone());

        record.age_limit = base::first_text(&root, &INFO_LINE_SELECTOR).and_then(|line| {
            let parts: Vec<&str> = line.split('•').collect();
            if parts.len() > 1 {
                Some(parts.last()?.trim().to_string())
            } else {
                None
            }
        });

        record.image =
            base::absolute_url(BASE_URL, base::first_attr(&root, &IMAGE_SELECTOR, "src"));

        if let Some(date_text) = base::first_text(&root, &DATE_SELECTOR) {
            record.date = dates::normalize_listed_date(&date_text);
            if record.date.is_none() {
                tracing::warn!("unparseable listed date for {}: {date_text}", stub.title);
            }
        }

        if let Some(place_text) = base::first_text(&root, &PLACE_SELECTOR) {
            let place_text = base::plain_spaces(&place_text);
            match place_text.split_once("г. ") {
                Some((name, address)) => {
                    record.place_name = Some(name.trim().to_string());
                    record.place_address = Some(format!("г. {}", address.trim()));
                }
                None => record.place_name = Some(place_text.trim().to_string()),
            }
        }

        record.price = base::first_text(&root, &PRICE_SELECTOR).and_then(|text| {
            let text = base::plain_spaces(&text).replace("Стоимость билетов", "");
            let trimmed = text.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        record.ticket_link = base::absolute_url(BASE_URL, find_ticket_link(&document));

        let mut description = Vec::new();
        if let Some(text) = base::first_text(&root, &DESCRIPTION_SELECTOR) {
            description.push(base::plain_spaces(&text));
        }
        if let Some(text) = base::first_text(&root, &DESCRIPTION_BOTTOM_SELECTOR) {
            description.push(text);
        }
        if !description.is_empty() {
            record.full_description = Some(description.join("\n\n"));
        }

        record.gallery_images = document
            .select(&GALLERY_SELECTOR)
            .take(GALLERY_LIMIT)
            .filter_map(|link| link.value().attr("href"))
            .filter(|href| !href.starts_with("https://"))
            .filter_map(|href| base::absolute_url(BASE_URL, Some(href.to_string())))
            .collect();

        record.tags = tags::generate(
            tags::TagStyle::Afisha,
            record.age_limit.as_deref(),
            record.price.as_deref(),
            &stub.detail_url,
        );

        Some(record)
    }
}

/// The purchase link comes in three markup variants: a labelled button, the
/// Yandex ticket widget, or a label span nested inside the anchor.
fn find_ticket_link(document: &Html) -> Option<String> {
    for anchor in document.select(&TICKET_BTN_SELECTOR) {
        if base::inner_text(anchor).contains("Купить билет") {
            if let Some(href) = anchor.value().attr("href") {
                return Some(href.to_string());
            }
        }
    }
    if let Some(anchor) = document.select(&YATICKET_SELECTOR).next() {
        if let Some(href) = anchor.value().attr("href") {
            return Some(href.to_string());
        }
    }
    for span in document.select(&SPAN_SELECTOR) {
        if !base::inner_text(span).contains("Купить билет") {
            continue;
        }
        let mut node = span.parent();
        while let Some(current) = node {
            if let Some(element) = ElementRef::wrap(current) {
                if element.value().name() == "a"
                    && element.value().attr("target") == Some("_blank")
                {
                    return element.value().attr("href").map(str::to_string);
                }
            }
            node = current.parent();
        }
    }
    None
}
