use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::info_block::{classify, InfoFragment, FREE_PRICE};
use super::{base, EventSource};
use crate::models::{CardStub, EventRecord};

const BASE_URL: &str = "https://www.culture.ru";
const THEATER_URL: &str = "https://www.culture.ru/afisha/tulskaya-oblast-tula/instituteType-theater";
const SOURCE_ID: &str = "culture";
const SOURCE_NAME: &str = "Культура.рф";

const NO_RESULTS_TEXT: &str = "К сожалению, событий по вашему запросу не найдено";

static NO_RESULTS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Lhfwa").expect("culture no-results selector"));
static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.CHPy6").expect("culture card selector"));
static CARD_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.p1Gbz").expect("culture card title"));
static CARD_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("anchor selector"));
static INFO_BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Jds71").expect("culture info block"));
static INFO_ITEM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div._19IwE").expect("culture info item"));
static ICON_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("svg").expect("svg selector"));
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.xZmPc").expect("culture description"));
static TICKET_BUTTON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("button._7V9xp").expect("culture ticket button"));
static TAGS_CONTAINER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.ciUqX").expect("culture tags container"));
static TAG_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.Bgm4p").expect("culture tag link"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.KRQ9s").expect("culture image"));
static PLACE_NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Heq3A").expect("culture place name"));
static PLACE_ADDRESS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.C3QPv").expect("culture place address"));

pub struct Culture;

impl EventSource for Culture {
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
        Some(format!("{THEATER_URL}?page={page}"))
    }

    fn listing_exhausted(&self, html: &str) -> bool {
        let document = Html::parse_document(html);
        document
            .select(&NO_RESULTS_SELECTOR)
            .any(|node| base::inner_text(node).contains(NO_RESULTS_TEXT))
    }

    fn list_cards(&self, html: &str) -> Vec<CardStub> {
        let document = Html::parse_document(html);
        let mut stubs = Vec::new();
        for card in document.select(&CARD_SELECTOR) {
            let title = match base::first_text(&card, &CARD_TITLE_SELECTOR) {
                Some(title) => title,
                None => continue,
            };
            let detail_url = base::absolute_url(
                BASE_URL,
                base::first_attr(&card, &CARD_LINK_SELECTOR, "href"),
            );
            if let Some(url) = detail_url {
                stubs.push(CardStub::new(title, url));
            }
        }
        stubs
    }

    fn extract_detail(&self, html: &str, stub: &CardStub) -> Option<EventRecord> {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let mut record = EventRecord::new(stub.title.clone());

        let info_block = document.select(&INFO_BLOCK_SELECTOR).next();
        let fragments: Vec<InfoFragment> = info_block
            .map(|block| {
                block
                    .select(&INFO_ITEM_SELECTOR)
                    .map(|item| {
                        let text = base::inner_text(item);
                        if item.select(&ICON_SELECTOR).next().is_some() {
                            InfoFragment::icon(text)
                        } else {
                            InfoFragment::text(text)
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let fields = classify(&fragments);
        record.age_limit = fields.age_limit;
        record.date = fields.date;
        record.price = fields.price.or_else(|| {
            // The free-of-charge note sometimes sits outside the typed items.
            info_block
                .filter(|block| block.html().contains(FREE_PRICE))
                .map(|_| FREE_PRICE.to_string())
        });

        record.ticket_link = document
            .select(&TICKET_BUTTON_SELECTOR)
            .next()
            .map(|_| stub.detail_url.clone());

        record.full_description = base::first_text(&root, &DESCRIPTION_SELECTOR);

        record.tags = document
            .select(&TAGS_CONTAINER_SELECTOR)
            .next()
            .map(|container| {
                container
                    .select(&TAG_LINK_SELECTOR)
                    .map(|tag| base::inner_text(tag))
                    .collect()
            })
            .unwrap_or_default();

        record.image = base::first_attr(&root, &IMAGE_SELECTOR, "src")
            .and_then(|src| unwrap_image_src(&src));

        record.place_name = base::first_text(&root, &PLACE_NAME_SELECTOR);
        record.place_address = base::first_text(&root, &PLACE_ADDRESS_SELECTOR);

        Some(record)
    }
}

/// The portal serves images through an optimizer endpoint
/// (`/_next/image?url=<escaped>&w=...`); the record wants the underlying URL.
fn unwrap_image_src(src: &str) -> Option<String> {
    if !src.starts_with("/_next/image?") {
        return base::absolute_url(BASE_URL, Some(src.to_string()));
    }
    let absolute = base::absolute_url(BASE_URL, Some(src.to_string()))?;
    let parsed = reqwest::Url::parse(&absolute).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}
