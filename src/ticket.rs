use chrono::{SecondsFormat, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::{
    classifier::{detect_language, ComplaintClassifier},
    model::{ComplaintRecord, Language, TicketStatus},
    store::{ComplaintStore, StoreError},
};

const TICKET_PREFIX: &str = "CIV";
const SUFFIX_LEN: usize = 4;
const MAX_ID_ATTEMPTS: usize = 5;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// `CIV-<unix millis, base36>-<4 random base36 chars>`.
pub fn ticket_id_from<R: Rng>(unix_millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!(
        "{TICKET_PREFIX}-{}-{suffix}",
        to_base36(unix_millis.max(0) as u64)
    )
}

pub fn generate_ticket_id() -> String {
    ticket_id_from(Utc::now().timestamp_millis(), &mut rand::thread_rng())
}

/// Classify a complaint and persist it as a new ticket.
///
/// A missing language is detected from the text. Duplicate ids are retried
/// with a fresh id; any other store failure is returned as is.
pub async fn open_ticket(
    store: &ComplaintStore,
    classifier: &ComplaintClassifier,
    text: &str,
    language: Option<Language>,
) -> Result<ComplaintRecord, StoreError> {
    open_ticket_with(store, classifier, text, language, generate_ticket_id).await
}

/// Same as [`open_ticket`], drawing ticket ids from `next_id`.
pub async fn open_ticket_with(
    store: &ComplaintStore,
    classifier: &ComplaintClassifier,
    text: &str,
    language: Option<Language>,
    mut next_id: impl FnMut() -> String,
) -> Result<ComplaintRecord, StoreError> {
    let language = language.unwrap_or_else(|| detect_language(text));
    let category = classifier.classify(text).await.category;
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut attempt = 0;
    loop {
        attempt += 1;
        let record = ComplaintRecord {
            ticket_id: next_id(),
            created_at: created_at.clone(),
            language,
            category,
            status: TicketStatus::New,
            text: text.to_string(),
        };

        match store.insert(&record).await {
            Ok(()) => {
                info!(
                    ticket_id = %record.ticket_id,
                    category = %category,
                    language = %language,
                    backend = store.backend_name(),
                    "ticket created"
                );
                return Ok(record);
            }
            Err(StoreError::Duplicate(id)) if attempt < MAX_ID_ATTEMPTS => {
                warn!(ticket_id = %id, attempt, "ticket id collision, regenerating");
            }
            Err(err) => return Err(err),
        }
    }
}
