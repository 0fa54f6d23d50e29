use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use url::Url;

/// Client for the contact service endpoints used by audience resolution.
///
/// The timeout that bounds each call is configured on the underlying
/// [`reqwest::Client`] by the caller.
#[derive(Debug, Clone)]
pub struct ContactsClient {
    http: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl ContactsClient {
    /// Creates a new contacts client with the provided configuration.
    pub fn new(base_url: Url, api_token: Option<String>, http: Client) -> Self {
        Self {
            http,
            base_url,
            api_token,
        }
    }

    /// Fetches the deduplicated count of contacts reachable by the union of
    /// the selected lists and segments.
    ///
    /// A contact belonging to several selected sources is counted once by the
    /// server; this is the authoritative number the scheduler should prefer.
    pub async fn count_audience(
        &self,
        list_ids: &[String],
        segment_ids: &[String],
    ) -> Result<u64, ContactsError> {
        let mut url = self.base_url.join("contacts/count")?;
        {
            let mut query = url.query_pairs_mut();
            if !list_ids.is_empty() {
                query.append_pair("listIds", &list_ids.join(","));
            }
            if !segment_ids.is_empty() {
                query.append_pair("segmentIds", &segment_ids.join(","));
            }
        }

        let mut request = self.http.request(Method::GET, url);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request.send().await?;

        parse_json::<CountResponse>(response)
            .await
            .map(|body| body.count)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CountResponse {
    count: u64,
}

/// Errors produced by the contacts client.
#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("failed to build url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

async fn parse_json<T>(response: Response) -> Result<T, ContactsError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<unavailable>"));
        return Err(ContactsError::Status { status, body });
    }

    Ok(response.json().await?)
}
