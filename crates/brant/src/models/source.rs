use serde::{Deserialize, Serialize};

/// Citation metadata attached to a streamed response. The engine carries
/// the latest list forward untouched; a newly arriving list replaces the
/// previous one rather than merging with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

impl GroundingSource {
    pub fn new<U: Into<String>, T: Into<String>>(uri: U, title: T) -> Self {
        GroundingSource {
            uri: uri.into(),
            title: title.into(),
        }
    }
}
