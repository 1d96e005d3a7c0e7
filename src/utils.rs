use dirs::data_dir;
use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let root = base.join("event-scrape");
    if let Err(err) = fs::create_dir_all(&root) {
        tracing::error!("failed to create data root {:?}: {err}", root);
    }
    root
});

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

/// Root of the harvested event directories, one subfolder per source.
pub fn spectacles_root() -> PathBuf {
    data_root().join("spectacles")
}

/// Root of the favourites the presentation shell copies events into.
pub fn favourites_root() -> PathBuf {
    data_root().join("favourites")
}

pub fn ensure_parent(path: &PathBuf) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            tracing::error!("failed to create parent {:?}: {err}", parent);
        }
    }
}

/// Turns an event title into a filesystem-safe directory name: percent-escapes
/// are decoded, non-breaking-space variants become plain spaces, characters
/// the filesystem rejects are removed. An empty title gets a placeholder so
/// the record still lands somewhere discoverable.
pub fn sanitize_title(title: &str) -> String {
    if title.trim().is_empty() {
        return "Без названия".to_string();
    }
    let decoded = urlencoding::decode(title)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| title.to_string());
    let spaced = decoded.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let cleaned: String = spaced
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let trimmed = cleaned.trim().to_string();
    if trimmed.is_empty() {
        "Без названия".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_forbidden_characters() {
        assert_eq!(sanitize_title(r#"Кот: "в сапогах"/12+?"#), "Кот в сапогах12+");
    }

    #[test]
    fn sanitize_normalizes_space_variants() {
        assert_eq!(sanitize_title("Ночь&nbsp;в\u{a0}театре"), "Ночь в театре");
    }

    #[test]
    fn sanitize_decodes_percent_escapes() {
        assert_eq!(sanitize_title("%D0%A2%D0%B5%D0%B0%D1%82%D1%80"), "Театр");
    }

    #[test]
    fn empty_title_gets_placeholder() {
        assert_eq!(sanitize_title("   "), "Без названия");
        assert_eq!(sanitize_title("?*/"), "Без названия");
    }
}
