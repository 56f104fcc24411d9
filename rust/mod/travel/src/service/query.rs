//! Read-only catalog queries. Results keep catalog order.

use tripmatch_core::MbtiType;

use crate::model::{Destination, MbtiMatch};
use crate::service::TravelService;

/// Tag filter value meaning "no filter".
pub const ALL_TAGS: &str = "all";

impl TravelService {
    pub fn all(&self) -> Vec<Destination> {
        self.catalog.all().to_vec()
    }

    /// `None` for unknown ids.
    pub fn by_id(&self, id: &str) -> Option<Destination> {
        self.catalog.get(id).cloned()
    }

    /// Case-insensitive code lookup. An unknown code matches nothing.
    pub fn by_mbti(&self, code: &str) -> Vec<Destination> {
        match code.parse::<MbtiType>() {
            Ok(mbti_type) => self.by_mbti_type(mbti_type),
            Err(_) => Vec::new(),
        }
    }

    pub fn by_mbti_type(&self, mbti_type: MbtiType) -> Vec<Destination> {
        self.filter(|d| d.is_for(mbti_type))
    }

    /// Recommendations for `code`, each with its type-specific reason or
    /// the generic one, narrowed to `tag` unless it is [`ALL_TAGS`].
    pub fn mbti_matches(&self, code: &str, tag: &str) -> Vec<MbtiMatch> {
        let Ok(mbti_type) = code.parse::<MbtiType>() else {
            return Vec::new();
        };
        self.by_mbti_type(mbti_type)
            .into_iter()
            .filter(|d| tag == ALL_TAGS || d.has_tag(tag))
            .map(|d| MbtiMatch {
                reason: d.reason_for(mbti_type).to_string(),
                destination: d,
            })
            .collect()
    }

    /// Exact tag match; [`ALL_TAGS`] returns everything.
    pub fn by_tag(&self, tag: &str) -> Vec<Destination> {
        if tag == ALL_TAGS {
            return self.all();
        }
        self.filter(|d| d.has_tag(tag))
    }

    /// Case-insensitive substring search over name, description, location
    /// and tags. A blank keyword finds nothing; otherwise the keyword is
    /// matched as given, surrounding spaces included.
    pub fn search(&self, keyword: &str) -> Vec<Destination> {
        if keyword.trim().is_empty() {
            return Vec::new();
        }
        let needle = keyword.to_lowercase();
        self.filter(|d| d.matches_keyword(&needle))
    }

    /// The first `popular_limit` catalog entries.
    pub fn popular(&self) -> Vec<Destination> {
        self.catalog
            .all()
            .iter()
            .take(self.config.popular_limit)
            .cloned()
            .collect()
    }

    pub fn tags(&self) -> Vec<String> {
        self.catalog.tags().into_iter().map(str::to_string).collect()
    }

    fn filter(&self, pred: impl Fn(&Destination) -> bool) -> Vec<Destination> {
        self.catalog
            .all()
            .iter()
            .filter(|d| pred(d))
            .cloned()
            .collect()
    }
}
