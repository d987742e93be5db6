use serde::{Deserialize, Serialize};

use super::{category::Category, language::Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    InProgress,
    Resolved,
    Rejected,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "new" => Ok(TicketStatus::New),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "rejected" => Ok(TicketStatus::Rejected),
            other => Err(anyhow::anyhow!("unknown ticket status `{other}`")),
        }
    }
}

/// A persisted complaint ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    pub ticket_id: String,
    /// RFC 3339, UTC, millisecond precision.
    pub created_at: String,
    pub language: Language,
    pub category: Category,
    pub status: TicketStatus,
    pub text: String,
}
