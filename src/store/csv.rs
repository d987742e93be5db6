use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use super::StoreError;
use crate::model::ComplaintRecord;

const FILE_NAME: &str = "complaints.csv";
const HEADER: &str = "ticketId,createdAt,language,category,status,text";
const COLUMNS: usize = 6;

/// Append-only CSV ticket log.
///
/// Ticket ids already in the log are indexed in memory at open, so duplicate
/// checks do not rescan the file.
pub struct CsvStore {
    path: PathBuf,
    known_ids: Mutex<HashSet<String>>,
}

impl CsvStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create data dir at {}", dir.display()))?;

        let path = dir.join(FILE_NAME);
        ensure_header(&path).await?;

        let known_ids = read_log(&path)
            .await?
            .unwrap_or_default()
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            path,
            known_ids: Mutex::new(known_ids),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn insert(&self, record: &ComplaintRecord) -> Result<(), StoreError> {
        let mut known_ids = self.known_ids.lock().await;
        if known_ids.contains(&record.ticket_id) {
            return Err(StoreError::Duplicate(record.ticket_id.clone()));
        }

        ensure_header(&self.path).await?;

        let row = encode_row(record)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        file.write_all(row.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;

        known_ids.insert(record.ticket_id.clone());
        Ok(())
    }

    pub async fn get(&self, ticket_id: &str) -> Result<Option<ComplaintRecord>> {
        let Some(raw) = read_log(&self.path).await? else {
            return Ok(None);
        };

        for line in raw.lines().skip(1) {
            if line.split(',').next() != Some(ticket_id) {
                continue;
            }
            return decode_row(line).map(Some);
        }

        Ok(None)
    }
}

/// Write the header only when the log does not exist yet; an existing log is
/// never truncated.
async fn ensure_header(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data dir at {}", dir.display()))?;
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to create {}", path.display()))
        }
    };

    file.write_all(format!("{HEADER}\n").as_bytes())
        .await
        .with_context(|| format!("Failed to write header to {}", path.display()))?;
    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", path.display()))
}

async fn read_log(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// The text column is JSON-string escaped without the surrounding quotes, so
/// commas and newlines stay on one line.
fn encode_row(record: &ComplaintRecord) -> Result<String> {
    let quoted = serde_json::to_string(&record.text)?;
    let escaped = &quoted[1..quoted.len() - 1];

    Ok(format!(
        "{},{},{},{},{},{}\n",
        record.ticket_id,
        record.created_at,
        record.language.code(),
        record.category.as_str(),
        record.status.as_str(),
        escaped
    ))
}

fn decode_row(line: &str) -> Result<ComplaintRecord> {
    let fields: Vec<&str> = line.splitn(COLUMNS, ',').collect();
    if fields.len() != COLUMNS {
        return Err(anyhow!("malformed complaint row: {line}"));
    }

    let text: String = serde_json::from_str(&format!("\"{}\"", fields[5]))
        .with_context(|| format!("malformed text column for ticket {}", fields[0]))?;

    Ok(ComplaintRecord {
        ticket_id: fields[0].to_string(),
        created_at: fields[1].to_string(),
        language: fields[2].parse()?,
        category: fields[3].parse()?,
        status: fields[4].parse()?,
        text,
    })
}
