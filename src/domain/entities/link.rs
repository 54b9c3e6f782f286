//! Short link entity mapping an identifier to its destination.

/// A short identifier together with the URL it redirects to.
///
/// The destination is assumed to be an absolute URL and is never checked
/// for reachability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: String,
    pub url: String,
}

impl ShortLink {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}
