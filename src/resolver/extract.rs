use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::models::Metadata;

static OG_SITE_NAME: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:site_name"]"#));
static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static OG_IMAGE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:image"]"#));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Build a `Metadata` record from an HTML document.
///
/// Open Graph tags take precedence; the `<title>` element, the plain
/// `description` meta tag and the page's `<img>` elements are fallbacks.
/// `site_name` falls back to the hostname of `base_url`, which is also the
/// base for resolving relative image sources. `url` is set to `base_url`.
pub fn extract(html: &str, base_url: &Url) -> Metadata {
    let document = Html::parse_document(html);

    let page_name = first_attr(&document, &OG_SITE_NAME, "content")
        .or_else(|| base_url.host_str().map(str::to_string))
        .unwrap_or_default();

    let title = first_attr(&document, &OG_TITLE, "content")
        .or_else(|| title_text(&document))
        .unwrap_or_default();

    let description = first_attr(&document, &OG_DESCRIPTION, "content")
        .or_else(|| first_attr(&document, &META_DESCRIPTION, "content"))
        .unwrap_or_default();

    let mut images = all_attrs(&document, &OG_IMAGE, "content");
    if images.is_empty() {
        images = all_attrs(&document, &IMG, "src")
            .into_iter()
            .filter_map(|src| base_url.join(&src).ok())
            .map(String::from)
            .collect();
    }

    Metadata {
        url: base_url.to_string(),
        page_name,
        title,
        description,
        images,
    }
}

/// Trimmed `attr` of the first element matching `selector`. Only the first
/// match is consulted; a blank value counts as absent.
pub fn first_attr(doc: &Html, selector: &Selector, attr: &str) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trimmed, non-blank `attr` values of every element matching `selector`, in
/// document order.
pub fn all_attrs(doc: &Html, selector: &Selector, attr: &str) -> Vec<String> {
    doc.select(selector)
        .filter_map(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn title_text(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
