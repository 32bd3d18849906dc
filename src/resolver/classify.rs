use url::Url;

/// Full YouTube domain; the video ID lives in the `v` query parameter.
pub const FULL_DOMAIN: &str = "youtube.com";
/// Short-link domain; the video ID is the path.
pub const SHORT_DOMAIN: &str = "youtu.be";

/// Path prefixes on the full domain that carry the video ID as the next
/// segment instead of in `v`.
const ID_PATH_PREFIXES: &[&str] = &["/shorts/", "/embed/", "/live/"];

/// Result of inspecting a URL for the specially handled video provider.
///
/// `provider_id` may be empty even when `is_special_provider` is true, e.g.
/// for a channel page. Consumers that need the ID must handle that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_special_provider: bool,
    pub provider_id: String,
}

pub fn classify(url: &Url) -> Classification {
    let host = url.host_str().unwrap_or_default();

    if host.contains(SHORT_DOMAIN) {
        let path = url.path();
        return Classification {
            is_special_provider: true,
            provider_id: path.strip_prefix('/').unwrap_or(path).to_string(),
        };
    }

    if host.contains(FULL_DOMAIN) {
        let provider_id = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
            .or_else(|| id_from_path(url.path()))
            .unwrap_or_default();
        return Classification {
            is_special_provider: true,
            provider_id,
        };
    }

    Classification::default()
}

fn id_from_path(path: &str) -> Option<String> {
    ID_PATH_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
        .and_then(|rest| rest.split('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
