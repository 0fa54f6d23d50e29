use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::ContactsClient;

/// A contact list chosen for a send, with the count the UI last cached for
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSelection {
    pub id: String,
    #[serde(default)]
    pub cached_count: u64,
}

/// An audience segment chosen for a send, with its cached approximate size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSelection {
    pub id: String,
    #[serde(default)]
    pub approximate_count: u64,
}

/// The mix of lists and segments a send targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudienceSelection {
    #[serde(default)]
    pub lists: Vec<ListSelection>,
    #[serde(default)]
    pub segments: Vec<SegmentSelection>,
}

impl AudienceSelection {
    /// Returns `true` when neither lists nor segments were selected.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.segments.is_empty()
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.lists.iter().map(|list| list.id.clone()).collect()
    }

    pub fn segment_ids(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| segment.id.clone())
            .collect()
    }

    /// Sum of the cached counts with no dedup across overlapping sources.
    ///
    /// A contact present in two selected lists, or in both a list and a
    /// segment, is counted once per source here.
    pub fn cached_total(&self) -> u64 {
        let lists: u64 = self.lists.iter().map(|list| list.cached_count).sum();
        let segments: u64 = self
            .segments
            .iter()
            .map(|segment| segment.approximate_count)
            .sum();
        lists + segments
    }
}

/// An audience size with its provenance.
///
/// Only `Authoritative` totals are deduplicated. `Approximate` totals come
/// from the cached-count fallback and may overcount contacts that belong to
/// more than one selected source; callers surface that difference rather than
/// treating the two as equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAudience {
    Authoritative { total: u64 },
    Approximate { total: u64 },
}

impl ResolvedAudience {
    /// Returns the resolved contact count regardless of provenance.
    pub fn total(self) -> u64 {
        match self {
            Self::Authoritative { total } | Self::Approximate { total } => total,
        }
    }

    /// Returns `true` when the total came from the deduplicated server-side
    /// count.
    pub fn is_authoritative(self) -> bool {
        matches!(self, Self::Authoritative { .. })
    }
}

/// Resolves a selection into the single total the stage generator consumes.
#[derive(Debug, Clone)]
pub struct AudienceResolver {
    client: ContactsClient,
}

impl AudienceResolver {
    pub fn new(client: ContactsClient) -> Self {
        Self { client }
    }

    /// Resolves the selection, preferring the authoritative deduplicated
    /// count.
    ///
    /// Resolution never fails: an unreachable or erroring contact service
    /// degrades to the `Approximate` sum of cached counts (zero when nothing
    /// is cached), and an empty selection short-circuits to an authoritative
    /// zero without a network call.
    pub async fn resolve(&self, selection: &AudienceSelection) -> ResolvedAudience {
        if selection.is_empty() {
            return ResolvedAudience::Authoritative { total: 0 };
        }

        match self
            .client
            .count_audience(&selection.list_ids(), &selection.segment_ids())
            .await
        {
            Ok(total) => ResolvedAudience::Authoritative { total },
            Err(err) => {
                let total = selection.cached_total();
                warn!(
                    stage = "audience",
                    error = %err,
                    total,
                    "authoritative count unavailable, falling back to cached sums"
                );
                ResolvedAudience::Approximate { total }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;
    use url::Url;

    fn resolver(base_url: &Url) -> AudienceResolver {
        AudienceResolver::new(ContactsClient::new(
            base_url.clone(),
            None,
            Client::builder().build().expect("client"),
        ))
    }

    /// One list and one segment that fully overlap: 500 cached contacts each,
    /// 500 distinct contacts in total.
    fn overlapping_selection() -> AudienceSelection {
        AudienceSelection {
            lists: vec![ListSelection {
                id: "list-1".to_string(),
                cached_count: 500,
            }],
            segments: vec![SegmentSelection {
                id: "segment-1".to_string(),
                approximate_count: 500,
            }],
        }
    }

    #[tokio::test]
    async fn authoritative_count_is_deduplicated() {
        let server = MockServer::start_async().await;
        let base = Url::parse(&server.url("/api/")).expect("url");

        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/contacts/count")
                    .query_param("listIds", "list-1")
                    .query_param("segmentIds", "segment-1");
                then.status(200).json_body(json!({ "count": 500 }));
            })
            .await;

        let resolved = resolver(&base).resolve(&overlapping_selection()).await;
        mock.assert_async().await;

        assert_eq!(resolved, ResolvedAudience::Authoritative { total: 500 });
        assert!(resolved.is_authoritative());
        assert_eq!(resolved.total(), 500);
    }

    #[tokio::test]
    async fn fallback_sums_cached_counts_without_dedup() {
        let server = MockServer::start_async().await;
        let base = Url::parse(&server.url("/api/")).expect("url");

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/contacts/count");
                then.status(500).body("boom");
            })
            .await;

        let resolved = resolver(&base).resolve(&overlapping_selection()).await;

        // The fallback double-counts the overlap; callers can tell because
        // the result is not authoritative.
        assert_eq!(resolved, ResolvedAudience::Approximate { total: 1_000 });
        assert!(!resolved.is_authoritative());
        assert_eq!(resolved.total(), 1_000);
    }

    #[tokio::test]
    async fn the_two_paths_may_disagree() {
        let server = MockServer::start_async().await;
        let base = Url::parse(&server.url("/api/")).expect("url");
        let selection = overlapping_selection();

        let mut mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/contacts/count");
                then.status(200).json_body(json!({ "count": 500 }));
            })
            .await;

        let authoritative = resolver(&base).resolve(&selection).await;
        mock.delete_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/contacts/count");
                then.status(502).body("bad gateway");
            })
            .await;

        let approximate = resolver(&base).resolve(&selection).await;

        assert_ne!(authoritative.total(), approximate.total());
        assert!(authoritative.is_authoritative());
        assert!(!approximate.is_authoritative());
    }

    #[tokio::test]
    async fn empty_selection_short_circuits_to_zero() {
        let server = MockServer::start_async().await;
        let base = Url::parse(&server.url("/api/")).expect("url");

        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/contacts/count");
                then.status(200).json_body(json!({ "count": 99 }));
            })
            .await;

        let resolved = resolver(&base).resolve(&AudienceSelection::default()).await;

        assert_eq!(resolved, ResolvedAudience::Authoritative { total: 0 });
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn unreachable_service_degrades_to_cached_sums() {
        // No server listening at all.
        let base = Url::parse("http://127.0.0.1:9/api/").expect("url");

        let resolved = resolver(&base).resolve(&overlapping_selection()).await;

        assert_eq!(resolved, ResolvedAudience::Approximate { total: 1_000 });
    }
}
