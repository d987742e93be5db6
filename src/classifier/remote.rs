use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::{config::RemoteConfig, model::Category};

/// Label heuristics, checked in order. The first match wins.
static LABEL_RULES: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
    [
        (r"garbage|trash|waste|litter|rubbish", Category::Garbage),
        (r"street.?light|lamp|light|bulb", Category::Streetlight),
        (r"water|leak|pipe", Category::WaterLeak),
        (r"road|pothole|street damage|asphalt", Category::RoadDamage),
        (r"drain|sewage|sewer|gutter", Category::Drainage),
    ]
    .into_iter()
    .map(|(pattern, cat)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("invalid label pattern");
        (re, cat)
    })
    .collect()
});

/// Map a free-form provider label onto the fixed category set.
pub fn map_remote_label(label: &str) -> Category {
    LABEL_RULES
        .iter()
        .find(|(re, _)| re.is_match(label))
        .map(|(_, cat)| *cat)
        .unwrap_or(Category::Other)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteLabel {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteResponse {
    Nested(Vec<Vec<RemoteLabel>>),
    Flat(Vec<RemoteLabel>),
    Single(RemoteLabel),
}

impl RemoteResponse {
    fn into_best(self) -> Option<RemoteLabel> {
        let labels = match self {
            RemoteResponse::Nested(outer) => outer.into_iter().flatten().collect(),
            RemoteResponse::Flat(labels) => labels,
            RemoteResponse::Single(label) => vec![label],
        };

        labels
            .into_iter()
            .filter(|l| l.score.is_finite())
            .reduce(|best, next| if next.score > best.score { next } else { best })
    }
}

/// Pick the best label out of a provider response body.
pub fn parse_remote_response(body: &[u8]) -> Result<RemoteLabel> {
    let parsed: RemoteResponse =
        serde_json::from_slice(body).context("unrecognized classifier response")?;
    parsed
        .into_best()
        .ok_or_else(|| anyhow!("classifier response contained no labels"))
}

/// HTTP text-classification provider (Hugging Face inference style).
pub struct RemoteClassifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl RemoteClassifier {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("failed to build classifier http client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn classify(&self, text: &str) -> Result<RemoteLabel> {
        let mut request = self.client.post(&self.url).json(&json!({ "inputs": text }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("classifier request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("classifier returned {status}"));
        }

        let body = response
            .bytes()
            .await
            .context("failed to read classifier response")?;

        parse_remote_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_provider_labels() {
        assert_eq!(map_remote_label("Garbage Collection"), Category::Garbage);
        assert_eq!(map_remote_label("rubbish"), Category::Garbage);
        assert_eq!(map_remote_label("Street-Light outage"), Category::Streetlight);
        assert_eq!(map_remote_label("LABEL_pipe"), Category::WaterLeak);
        assert_eq!(map_remote_label("asphalt"), Category::RoadDamage);
        assert_eq!(map_remote_label("sewer blockage"), Category::Drainage);
        assert_eq!(map_remote_label("noise"), Category::Other);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        // both "waste" and "water" match; garbage is checked first
        assert_eq!(map_remote_label("waste water"), Category::Garbage);
    }

    #[test]
    fn parses_flat_label_lists() {
        let body = br#"[{"label":"road","score":0.2},{"label":"trash","score":0.7}]"#;
        let best = parse_remote_response(body).unwrap();
        assert_eq!(best.label, "trash");
        assert_eq!(best.score, 0.7);
    }

    #[test]
    fn parses_nested_and_single_responses() {
        let nested = br#"[[{"label":"drain","score":0.9},{"label":"lamp","score":0.1}]]"#;
        assert_eq!(parse_remote_response(nested).unwrap().label, "drain");

        let single = br#"{"label":"pothole","score":0.55}"#;
        assert_eq!(parse_remote_response(single).unwrap().label, "pothole");
    }

    #[test]
    fn rejects_empty_or_foreign_bodies() {
        assert!(parse_remote_response(b"[]").is_err());
        assert!(parse_remote_response(br#"{"error":"loading"}"#).is_err());
        assert!(parse_remote_response(b"not json").is_err());
    }
}
