use serde::{Deserialize, Serialize};

/// Page metadata returned by `GET /metadata`.
///
/// `title` and `description` are empty strings when no source provided them,
/// and `images` is empty rather than absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub url: String,
    pub page_name: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}
