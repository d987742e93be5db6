pub mod category;
pub mod keywords;
pub mod language;
pub mod remote;

use std::sync::Arc;

use tracing::{info, warn};

pub use category::{classify_complaint, Classification, Classifier, ScoreMap};
pub use keywords::KeywordTable;
pub use language::detect_language;
pub use remote::{map_remote_label, RemoteClassifier};

/// Category source used by the service: an optional remote provider first,
/// the local keyword scorer otherwise.
#[derive(Clone, Default)]
pub struct ComplaintClassifier {
    remote: Option<Arc<RemoteClassifier>>,
}

impl ComplaintClassifier {
    pub fn local() -> Self {
        Self { remote: None }
    }

    pub fn with_remote(remote: RemoteClassifier) -> Self {
        Self {
            remote: Some(Arc::new(remote)),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn classify(&self, text: &str) -> Classification {
        if let Some(remote) = &self.remote {
            match remote.classify(text).await {
                Ok(label) if label.score.is_finite() && label.score > 0.0 => {
                    let category = map_remote_label(&label.label);
                    info!(
                        label = %label.label,
                        score = label.score,
                        category = %category,
                        "remote classification"
                    );
                    return Classification::single(category, label.score);
                }
                Ok(label) => {
                    warn!(
                        label = %label.label,
                        score = label.score,
                        "remote label has no usable score, using keyword classifier"
                    );
                }
                Err(err) => {
                    warn!(
                        error = ?err,
                        url = remote.url(),
                        "remote classification failed, using keyword classifier"
                    );
                }
            }
        }

        classify_complaint(text)
    }
}
