use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{base, tags, EventSource};
use crate::models::{CardStub, EventRecord};

const BASE_URL: &str = "https://live.mts.ru";
const THEATER_URL: &str = "https://live.mts.ru/tula/collections/theater";
const SOURCE_ID: &str = "mts";
const SOURCE_NAME: &str = "МТС Лайв";

const MISSING_PRICE: &str = "Цена не указана";

/// Size of the worker-thread pool this source's crawl runs on.
pub const MAX_WORKERS: usize = 4;

static CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.AnnouncementPreview_description__AVWrS").expect("mts card selector")
});
static CARD_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[data-type="nazvanie_meropriyatiya"]"#).expect("mts title selector")
});
static CARD_PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[data-type="cena"]"#).expect("mts price selector"));
static CARD_TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time").expect("time selector"));
static CARD_VENUE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[aria-disabled="false"]"#).expect("mts venue selector"));
static DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.CommonDescription_description__SSktZ").expect("mts description")
});
static AGE_BADGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Badge_container__rAaAq").expect("mts age badge"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.LazyImage_img__Nz285").expect("mts image"));
static VENUE_NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.VenueTitles_title__cttAS").expect("mts venue name"));
static VENUE_ADDRESS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.VenueInfo_address__hH7tG").expect("mts venue address"));

pub struct Mts;

impl EventSource for Mts {
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

    fn admission_limit(&self) -> usize {
        MAX_WORKERS
    }

    fn list_cards(&self, html: &str) -> Vec<CardStub> {
        let document = Html::parse_document(html);
        let mut stubs = Vec::new();
        for card in document.select(&CARD_SELECTOR) {
            let Some(title_tag) = card.select(&CARD_TITLE_SELECTOR).next() else {
                continue;
            };
            let Some(title) = title_tag.value().attr("title").map(base::clean_text) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }
            let Some(detail_url) = base::absolute_url(
                BASE_URL,
                title_tag.value().attr("href").map(str::to_string),
            ) else {
                continue;
            };

            let mut stub = CardStub::new(title, detail_url);
            stub.price = Some(
                base::first_text(&card, &CARD_PRICE_SELECTOR)
                    .unwrap_or_else(|| MISSING_PRICE.to_string()),
            );
            stub.date = base::first_text(&card, &CARD_TIME_SELECTOR);
            stub.venue = base::first_attr(&card, &CARD_VENUE_SELECTOR, "title");
            stubs.push(stub);
        }
        stubs
    }

    fn extract_detail(&self, html: &str, stub: &CardStub) -> Option<EventRecord> {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let mut record = EventRecord::new(stub.title.clone());

        record.price = stub.price.clone();
        record.date = stub.date.clone();
        record.place_name = stub.venue.clone();

        record.age_limit = base::first_text(&root, &AGE_BADGE_SELECTOR);
        record.image =
            base::absolute_url(BASE_URL, base::first_attr(&root, &IMAGE_SELECTOR, "src"));
        record.full_description = base::first_text(&root, &DESCRIPTION_SELECTOR);
        // The listing card's venue label wins; the detail page only fills a
        // gap when the card had none.
        record.place_name = record
            .place_name
            .or_else(|| base::first_text(&root, &VENUE_NAME_SELECTOR));
        record.place_address = base::first_text(&root, &VENUE_ADDRESS_SELECTOR);

        // The platform has no standalone ticket page; the event page is where
        // tickets are bought.
        record.ticket_link = Some(stub.detail_url.clone());

        record.tags = tags::generate(
            tags::TagStyle::Mts,
            record.age_limit.as_deref(),
            record.price.as_deref(),
            &stub.detail_url,
        );

        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
    <div class="AnnouncementPreview_description__AVWrS">
        <a data-type="nazvanie_meropriyatiya" title="Ревизор" href="/tula/theater/revizor-42"></a>
        <a data-type="cena">от 800 ₽</a>
        <time>21 сентября</time>
        <a aria-disabled="false" title="Городской концертный зал"></a>
    </div>
    <div class="AnnouncementPreview_description__AVWrS">
        <a data-type="nazvanie_meropriyatiya" title="Щелкунчик" href="/tula/theater/shchelkunchik-7"></a>
        <time>5 января</time>
    </div>
    <div class="AnnouncementPreview_description__AVWrS">
        <a data-type="cena">от 500 ₽</a>
    </div>
    "#;

    const DETAIL_HTML: &str = r#"
    <div class="Badge_container__rAaAq">16+</div>
    <img class="LazyImage_img__Nz285" src="https://cdn.live.mts.ru/poster/revizor.jpg">
    <div class="CommonDescription_description__SSktZ">Комедия по Гоголю на большой сцене.</div>
    <a class="VenueTitles_title__cttAS">Городской концертный зал</a>
    <div class="VenueInfo_address__hH7tG">Тула, ул. Советская, 2</div>
    "#;

    #[test]
    fn lists_cards_with_listing_level_fields() {
        let stubs = Mts.list_cards(LISTING_HTML);
        assert_eq!(stubs.len(), 2, "card without a title anchor must be dropped");

        let first = &stubs[0];
        assert_eq!(first.title, "Ревизор");
        assert_eq!(
            first.detail_url,
            "https://live.mts.ru/tula/theater/revizor-42"
        );
        assert_eq!(first.price.as_deref(), Some("от 800 ₽"));
        assert_eq!(first.date.as_deref(), Some("21 сентября"));
        assert_eq!(first.venue.as_deref(), Some("Городской концертный зал"));

        let second = &stubs[1];
        assert_eq!(
            second.price.as_deref(),
            Some(MISSING_PRICE),
            "missing listing price falls back to the placeholder"
        );
        assert_eq!(second.venue, None);
    }

    #[test]
    fn detail_merges_stub_and_page_fields() {
        let stubs = Mts.list_cards(LISTING_HTML);
        let record = Mts.extract_detail(DETAIL_HTML, &stubs[0]).unwrap();

        assert_eq!(record.title, "Ревизор");
        assert_eq!(record.price.as_deref(), Some("от 800 ₽"));
        assert_eq!(record.date.as_deref(), Some("21 сентября"));
        assert_eq!(record.age_limit.as_deref(), Some("16+"));
        assert_eq!(
            record.image.as_deref(),
            Some("https://cdn.live.mts.ru/poster/revizor.jpg")
        );
        assert_eq!(
            record.full_description.as_deref(),
            Some("Комедия по Гоголю на большой сцене.")
        );
        assert_eq!(
            record.place_name.as_deref(),
            Some("Городской концертный зал")
        );
        assert_eq!(record.place_address.as_deref(), Some("Тула, ул. Советская, 2"));
        assert_eq!(
            record.ticket_link.as_deref(),
            Some("https://live.mts.ru/tula/theater/revizor-42")
        );
        assert_eq!(
            record.tags,
            vec![
                "Культура",
                "Искусство",
                "Для взрослых",
                "Театр",
                "Платно",
                "Событие месяца"
            ]
        );
    }

    #[test]
    fn detail_keeps_listing_venue_when_page_has_none() {
        let stubs = Mts.list_cards(LISTING_HTML);
        let record = Mts
            .extract_detail("<html><body></body></html>", &stubs[0])
            .unwrap();
        assert_eq!(
            record.place_name.as_deref(),
            Some("Городской концертный зал")
        );
        assert_eq!(record.place_address, None);
        assert_eq!(record.age_limit, None);
    }

    #[test]
    fn single_listing_page_only() {
        assert!(Mts.listing_url(1).is_some());
        assert!(Mts.listing_url(2).is_none());
    }
}
