//! HTTP client for the scoring service's internal score API.

use super::{ScoreFetch, ScoreSource, ScoreSourceError};
use crate::domain::{Address, ScoreRecord, StampContribution};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Scoring-service client authenticated with a static API credential.
#[derive(Clone)]
pub struct ScorerApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ScorerApiClient {
    /// Create a new client.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ScoreSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoreSourceError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn score_url(&self, scorer_id: u128, address: &Address) -> String {
        format!(
            "{}/internal/score/v2/{}/{}",
            self.base_url.trim_end_matches('/'),
            scorer_id,
            address
        )
    }
}

impl fmt::Debug for ScorerApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScorerApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl ScoreSource for ScorerApiClient {
    async fn fetch_score(
        &self,
        address: &Address,
        scorer_id: u128,
    ) -> Result<ScoreFetch, ScoreSourceError> {
        let url = self.score_url(scorer_id, address);
        debug!(address = %address, scorer_id, "Fetching score");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ScoreSourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(ScoreSourceError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScoreSourceError::NetworkError(e.to_string()))?;
        parse_score_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RawScoreResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    score: Option<String>,
    #[serde(default)]
    threshold: Option<String>,
    #[serde(default, alias = "passingScore")]
    passing_score: Option<bool>,
    #[serde(default, alias = "expirationTimestamp")]
    expiration_timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "ordered_stamps")]
    stamps: Vec<(String, RawStamp)>,
}

#[derive(Debug, Deserialize)]
struct RawStamp {
    score: String,
    #[serde(default, alias = "deduplicated")]
    dedup: bool,
    #[serde(default, alias = "expirationDate")]
    expiration_date: Option<DateTime<Utc>>,
}

/// Deserialize the `stamps` object into a list that keeps the service's key order.
fn ordered_stamps<'de, D>(deserializer: D) -> Result<Vec<(String, RawStamp)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StampsVisitor;

    impl<'de> Visitor<'de> for StampsVisitor {
        type Value = Vec<(String, RawStamp)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of provider name to stamp")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut stamps = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((provider, stamp)) = map.next_entry::<String, RawStamp>()? {
                stamps.push((provider, stamp));
            }
            Ok(stamps)
        }
    }

    deserializer.deserialize_option(StampsVisitor)
}

fn parse_score_response(body: &str) -> Result<ScoreFetch, ScoreSourceError> {
    let raw: RawScoreResponse =
        serde_json::from_str(body).map_err(|e| ScoreSourceError::ParseError(e.to_string()))?;

    if let Some(error) = raw.error.filter(|e| !e.trim().is_empty()) {
        return Ok(ScoreFetch::Reported(error));
    }

    let score = raw
        .score
        .ok_or_else(|| ScoreSourceError::ParseError("Missing score field".to_string()))?;
    let threshold = raw
        .threshold
        .ok_or_else(|| ScoreSourceError::ParseError("Missing threshold field".to_string()))?;
    let passing_score = raw
        .passing_score
        .ok_or_else(|| ScoreSourceError::ParseError("Missing passing_score field".to_string()))?;
    let expiration_timestamp = raw.expiration_timestamp.ok_or_else(|| {
        ScoreSourceError::ParseError("Missing expiration_timestamp field".to_string())
    })?;

    let stamps = raw
        .stamps
        .into_iter()
        .map(|(provider, stamp)| {
            (
                provider,
                StampContribution {
                    score: stamp.score,
                    deduplicated: stamp.dedup,
                    expiration: stamp.expiration_date,
                },
            )
        })
        .collect();

    Ok(ScoreFetch::Scored(ScoreRecord {
        score,
        threshold,
        passing_score,
        expiration_timestamp,
        stamps,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDRESS: &str = "0x00000000000000000000000000000000000000a1";

    fn client(base_url: String) -> ScorerApiClient {
        ScorerApiClient::new(base_url, "secret-key".to_string(), Duration::from_secs(5)).unwrap()
    }

    /// Stamp keys are not in alphabetical order.
    const SCORE_BODY: &str = r#"{
        "address": "0x00000000000000000000000000000000000000a1",
        "score": "5.6789",
        "passing_score": false,
        "last_score_timestamp": "2024-05-01T10:00:00.000000+00:00",
        "expiration_timestamp": "2024-08-01T10:00:00.750000+00:00",
        "threshold": "20.00000",
        "error": null,
        "stamps": {
            "twitter": {"score": "0.0000", "dedup": false, "expiration_date": null},
            "github": {
                "score": "5.6789",
                "dedup": false,
                "expiration_date": "2024-07-01T00:00:00Z"
            },
            "ens": {"score": "2.2", "dedup": true, "expiration_date": null}
        }
    }"#;

    fn stamp_names(fetch: ScoreFetch) -> Vec<String> {
        match fetch {
            ScoreFetch::Scored(record) => record.stamps.into_iter().map(|(n, _)| n).collect(),
            other => panic!("expected Scored, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_preserves_stamp_order() {
        let fetch = parse_score_response(SCORE_BODY).unwrap();
        let record = match fetch {
            ScoreFetch::Scored(r) => r,
            other => panic!("expected Scored, got {:?}", other),
        };
        let names: Vec<&str> = record.stamps.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["twitter", "github", "ens"]);
        assert_eq!(record.score, "5.6789");
        assert_eq!(record.threshold, "20.00000");
        assert!(!record.passing_score);
        assert!(record.stamp("ens").unwrap().deduplicated);
        assert!(record.stamp("github").unwrap().expiration.is_some());
        assert_eq!(record.expiration_timestamp.timestamp(), 1722506400);
    }

    #[test]
    fn test_parse_error_field_is_reported() {
        let body = serde_json::json!({
            "address": ADDRESS,
            "score": "12.5",
            "threshold": "20",
            "passing_score": false,
            "expiration_timestamp": "2099-01-01T00:00:00Z",
            "error": "rate limited",
            "stamps": {}
        });
        let fetch = parse_score_response(&body.to_string()).unwrap();
        assert_eq!(fetch, ScoreFetch::Reported("rate limited".to_string()));
    }

    #[test]
    fn test_parse_error_only_response() {
        let body = r#"{
            "address": "0x1",
            "score": null,
            "stamps": null,
            "error": "Unable to get score"
        }"#;
        let fetch = parse_score_response(body).unwrap();
        assert_eq!(fetch, ScoreFetch::Reported("Unable to get score".to_string()));
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let body = serde_json::json!({
            "score": "1",
            "threshold": "2",
            "passingScore": true,
            "expirationTimestamp": "2030-01-01T00:00:00Z",
            "stamps": { "gitcoin": { "score": "1", "deduplicated": false } }
        });
        let fetch = parse_score_response(&body.to_string()).unwrap();
        match fetch {
            ScoreFetch::Scored(record) => {
                assert!(record.passing_score);
                assert_eq!(record.stamps.len(), 1);
            }
            other => panic!("expected Scored, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_field_is_parse_error() {
        let body = r#"{"score": "1", "threshold": "2", "passing_score": true, "stamps": {}}"#;
        let result = parse_score_response(body);
        assert!(matches!(result, Err(ScoreSourceError::ParseError(_))));
    }

    #[test]
    fn test_parse_numeric_score_rejected() {
        let body = r#"{
            "score": 1.5,
            "threshold": "2",
            "passing_score": true,
            "expiration_timestamp": "2030-01-01T00:00:00Z"
        }"#;
        assert!(matches!(
            parse_score_response(body),
            Err(ScoreSourceError::ParseError(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let c = client("http://example.invalid".to_string());
        let rendered = format!("{:?}", c);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_fetch_score_sends_credential_and_keeps_stamp_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/internal/score/v2/335/{}", ADDRESS)))
            .and(header("authorization", "secret-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(SCORE_BODY, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let address = Address::parse(ADDRESS).unwrap();
        let fetch = client(format!("{}/", server.uri()))
            .fetch_score(&address, 335)
            .await
            .unwrap();
        assert_eq!(stamp_names(fetch), vec!["twitter", "github", "ens"]);
    }

    #[tokio::test]
    async fn test_fetch_score_non_2xx_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let address = Address::parse(ADDRESS).unwrap();
        let result = client(server.uri()).fetch_score(&address, 335).await;
        assert_eq!(
            result,
            Err(ScoreSourceError::HttpError {
                status: 401,
                message: "Invalid API key".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_score_unreachable_is_network_error() {
        let address = Address::parse(ADDRESS).unwrap();
        let result = client("http://127.0.0.1:1".to_string())
            .fetch_score(&address, 335)
            .await;
        assert!(matches!(result, Err(ScoreSourceError::NetworkError(_))));
    }
}
