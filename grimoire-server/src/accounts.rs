//! Account directory: registered users and their password hashes

use crate::auth::password::{hash_password, verify_password};
use grimoire_core::storage::{MemoryStorage, StorageProvider};
use grimoire_core::{StorageError, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default document accounts are persisted to
pub const ACCOUNTS_DOCUMENT: &str = "users.json";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("An account already exists for {0}")]
    EmailTaken(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountIndex {
    accounts: Vec<Account>,
}

/// Accounts persisted as one JSON document
pub struct AccountDirectory {
    storage: Arc<dyn StorageProvider>,
    document: String,
    index: RwLock<AccountIndex>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountDirectory {
    /// Load the directory from `document`, starting empty if it does not exist
    pub async fn open(
        storage: Arc<dyn StorageProvider>,
        document: impl Into<String>,
    ) -> Result<Self, AccountError> {
        let document = document.into();
        let index = match storage.read(&document).await {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(StorageError::NotFound(_)) => AccountIndex::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            storage,
            document,
            index: RwLock::new(index),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            document: ACCOUNTS_DOCUMENT.to_string(),
            index: RwLock::new(AccountIndex::default()),
        }
    }

    /// Register a new account
    pub async fn signup(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let email = normalize_email(email);

        // Hashing is CPU-bound; keep it off the async workers
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(|e| AccountError::Hashing(e.to_string()))?;

        let mut index = self.index.write().await;
        if index.accounts.iter().any(|a| a.email == email) {
            return Err(AccountError::EmailTaken(email));
        }

        let account = Account {
            id: UserId::new(Uuid::new_v4().to_string()),
            email,
            password_hash,
        };
        index.accounts.push(account.clone());

        let persisted = match serde_json::to_vec_pretty(&*index) {
            Ok(data) => self
                .storage
                .write(&self.document, data)
                .await
                .map_err(AccountError::from),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = persisted {
            index.accounts.pop();
            return Err(e);
        }

        tracing::info!(user_id = %account.id, "registered account");
        Ok(account)
    }

    /// Check credentials, returning the matching account
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let email = normalize_email(email);
        let account = self
            .index
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(AccountError::InvalidCredentials)?;

        let password = password.to_string();
        let hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(|e| AccountError::Hashing(e.to_string()))?;

        if matches {
            Ok(account)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }
}
