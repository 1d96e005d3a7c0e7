use serde::{Deserialize, Serialize};

/// Canonical event record, one per distinct event found at a source.
/// Field order matches the persisted `event_details.json` layout the
/// presentation shell reads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub title: String,
    pub age_limit: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub place_name: Option<String>,
    pub place_address: Option<String>,
    pub price: Option<String>,
    pub ticket_link: Option<String>,
    pub full_description: Option<String>,
    pub tags: Vec<String>,
    pub gallery_images: Vec<String>,
}

impl EventRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            age_limit: None,
            image: None,
            date: None,
            place_name: None,
            place_address: None,
            price: None,
            ticket_link: None,
            full_description: None,
            tags: Vec::new(),
            gallery_images: Vec::new(),
        }
    }
}

/// Lightweight reference to an event found on a listing page. Identity is
/// `(title, detail_url)`; the remaining fields carry listing-level data that
/// some sources only expose on the card itself.
#[derive(Clone, Debug)]
pub struct CardStub {
    pub title: String,
    pub detail_url: String,
    pub price: Option<String>,
    pub date: Option<String>,
    pub venue: Option<String>,
}

impl CardStub {
    pub fn new(title: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail_url: detail_url.into(),
            price: None,
            date: None,
            venue: None,
        }
    }
}
