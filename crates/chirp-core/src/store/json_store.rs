//! Single-file JSON record store
//!
//! Every operation loads the whole document, applies its change and rewrites
//! the whole document, all under one exclusive guard. Writes land through a
//! temp file and an atomic rename, so readers only ever see complete documents.

use crate::credentials::PasswordHasher;
use crate::error::{Error, Result};
use crate::store::document::{Account, Document, Post};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JSON-file repository for accounts and posts
pub struct JsonStore {
    path: PathBuf,
    /// Held for the full load -> mutate -> persist cycle, reads included
    guard: Mutex<()>,
    hasher: PasswordHasher,
}

impl JsonStore {
    /// Open the store at `path`, creating an empty document if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_hasher(path, PasswordHasher::default())
    }

    pub fn open_with_hasher(path: impl Into<PathBuf>, hasher: PasswordHasher) -> Result<Self> {
        let store = Self {
            path: path.into(),
            guard: Mutex::new(()),
            hasher,
        };

        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !store.path.exists() {
            store.persist(&Document::default())?;
            info!("Created empty document at {:?}", store.path);
        } else {
            // Corrupt file fails here, not on first use
            store.load()?;
            info!("Opened document at {:?}", store.path);
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    fn load(&self) -> Result<Document> {
        let content = fs::read_to_string(&self.path)?;
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }

    fn persist(&self, document: &Document) -> Result<()> {
        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(document)?;

        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Sibling of the document with `.tmp` appended to its full file name.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read<T>(&self, f: impl FnOnce(&Document) -> Result<T>) -> Result<T> {
        let _guard = self.guard.lock();
        let document = self.load()?;
        f(&document)
    }

    /// Load, mutate, persist. Nothing is written if `f` fails.
    fn write<T>(&self, f: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let _guard = self.guard.lock();
        let mut document = self.load()?;
        let out = f(&mut document)?;
        self.persist(&document)?;
        Ok(out)
    }

    /// Register an account, storing only the hash of `password`.
    pub fn create_account(&self, email: &str, password: &str) -> Result<Account> {
        // Hash outside the guard
        let password_hash = self.hasher.hash(password)?;

        let account = self.write(|doc| {
            if doc.account_by_email(email).is_some() {
                return Err(Error::AlreadyExists);
            }

            let account = Account {
                id: doc.next_account_id(),
                email: email.to_string(),
                password_hash,
                renewal_token: None,
                privileged: false,
            };
            doc.accounts.insert(account.id, account.clone());
            Ok(account)
        })?;

        info!("Account {} registered", account.id);
        Ok(account)
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Account> {
        self.read(|doc| doc.account_by_email(email).cloned().ok_or(Error::NotFound))
    }

    pub fn get_account(&self, id: u64) -> Result<Account> {
        self.read(|doc| doc.accounts.get(&id).cloned().ok_or(Error::NotFound))
    }

    /// Replace email and password hash; renewal token and privileged flag are kept.
    pub fn update_account(&self, id: u64, email: &str, password_hash: &str) -> Result<Account> {
        self.write(|doc| {
            if doc.account_by_email(email).is_some_and(|other| other.id != id) {
                return Err(Error::AlreadyExists);
            }

            let account = doc.accounts.get_mut(&id).ok_or(Error::NotFound)?;
            account.email = email.to_string();
            account.password_hash = password_hash.to_string();
            Ok(account.clone())
        })
    }

    /// Store `token` as the account's renewal credential, replacing any prior one.
    pub fn issue_renewal_token(&self, account_id: u64, token: &str) -> Result<()> {
        self.write(|doc| {
            let account = doc.accounts.get_mut(&account_id).ok_or(Error::NotFound)?;
            account.renewal_token = Some(token.to_string());
            Ok(())
        })
    }

    pub fn lookup_account_by_renewal_token(&self, token: &str) -> Result<u64> {
        self.read(|doc| {
            doc.accounts
                .values()
                .find(|a| a.renewal_token.as_deref() == Some(token))
                .map(|a| a.id)
                .ok_or(Error::NotFound)
        })
    }

    /// Clear the matching account's renewal token. Returns whether one matched.
    pub fn revoke_renewal_token(&self, token: &str) -> Result<bool> {
        let revoked = self.write(|doc| {
            Ok(doc
                .account_by_renewal_token_mut(token)
                .map(|account| account.renewal_token = None)
                .is_some())
        })?;

        debug!("Renewal token revoke (matched: {})", revoked);
        Ok(revoked)
    }

    pub fn set_privileged(&self, account_id: u64) -> Result<()> {
        self.write(|doc| {
            let account = doc.accounts.get_mut(&account_id).ok_or(Error::NotFound)?;
            account.privileged = true;
            Ok(())
        })?;

        info!("Account {} upgraded", account_id);
        Ok(())
    }

    pub fn create_post(&self, author_id: u64, body: &str) -> Result<Post> {
        self.write(|doc| {
            let post = Post {
                id: doc.next_post_id(),
                body: body.to_string(),
                author_id,
            };
            doc.posts.insert(post.id, post.clone());
            Ok(post)
        })
    }

    /// All posts, in storage order.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        self.read(|doc| Ok(doc.posts.values().cloned().collect()))
    }

    /// Fetch one post. Ids above the highest ever issued are rejected before lookup.
    pub fn get_post(&self, id: u64) -> Result<Post> {
        self.read(|doc| {
            if id == 0 || id > doc.post_ceiling() {
                return Err(Error::NotFound);
            }
            doc.posts.get(&id).cloned().ok_or(Error::NotFound)
        })
    }

    /// Remove a post. Returns whether anything was removed.
    pub fn delete_post(&self, id: u64) -> Result<bool> {
        self.write(|doc| Ok(doc.posts.remove(&id).is_some()))
    }
}
