//! JSON-file store for accounts and events
//!
//! The whole document lives in memory behind a `RwLock`. Readers clone a
//! consistent `Snapshot`; writers apply their change to a copy, persist it,
//! and only then swap it in, so a failed write leaves memory and disk agreeing.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use cashflow_core::model::{Account, AccountId, Event, EventId, Snapshot};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateAccountRequest, CreateEventRequest};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a valid data file: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode data file: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    doc: RwLock<Snapshot>,
}

impl Store {
    /// Load the document at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc: Snapshot = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no data file yet, starting empty");
                Snapshot::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        tracing::info!(
            path = %path.display(),
            accounts = doc.accounts.len(),
            events = doc.events.len(),
            "store loaded"
        );

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> ApiResult<Snapshot> {
        Ok(self.doc.read()?.clone())
    }

    pub fn accounts(&self) -> ApiResult<Vec<Account>> {
        Ok(self.doc.read()?.accounts.clone())
    }

    pub fn events(&self) -> ApiResult<Vec<Event>> {
        Ok(self.doc.read()?.events.clone())
    }

    /// Account names are unique; the id is a fresh uuid
    pub fn create_account(&self, req: CreateAccountRequest) -> ApiResult<Account> {
        self.update(|doc| {
            if doc.account_by_name(&req.name).is_some() {
                return Err(ApiError::Conflict(format!(
                    "account name {:?} is already in use",
                    req.name
                )));
            }
            let account = Account {
                id: AccountId::new(Uuid::new_v4().to_string()),
                name: req.name,
                color: req.color,
            };
            doc.accounts.push(account.clone());
            Ok(account)
        })
    }

    /// The owning account must exist when the event is created
    pub fn create_event(&self, req: CreateEventRequest) -> ApiResult<Event> {
        self.update(|doc| {
            if doc.account(&req.account).is_none() {
                return Err(ApiError::validation(
                    "account",
                    format!("account {} not found", req.account),
                ));
            }
            let event = req.into_event(EventId::new(Uuid::new_v4().to_string()));
            doc.events.push(event.clone());
            Ok(event)
        })
    }

    pub fn delete_event(&self, id: &EventId) -> ApiResult<Event> {
        self.update(|doc| {
            let index = doc
                .events
                .iter()
                .position(|e| &e.id == id)
                .ok_or_else(|| ApiError::EventNotFound(id.to_string()))?;
            Ok(doc.events.remove(index))
        })
    }

    /// Apply `change` to a copy of the document and persist it before it
    /// becomes visible
    fn update<T>(&self, change: impl FnOnce(&mut Snapshot) -> ApiResult<T>) -> ApiResult<T> {
        let mut doc = self.doc.write()?;
        let mut next = doc.clone();
        let out = change(&mut next)?;
        save(&self.path, &next)?;
        *doc = next;
        Ok(out)
    }
}

fn save(path: &Path, doc: &Snapshot) -> Result<(), StoreError> {
    let data = serde_json::to_string_pretty(doc)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &data).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "store saved");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()
}
