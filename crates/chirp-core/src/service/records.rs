//! Post service: create, list, fetch and delete with ownership rules.

use crate::config::{CoreConfig, DeletePolicy};
use crate::credentials::TokenAuthority;
use crate::error::{Error, Result};
use crate::service::censor::{mask_denylisted, MAX_POST_CHARS};
use crate::service::{authenticate, Caller};
use crate::store::{JsonStore, Post};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `"desc"` means descending; anything else is the default.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Filter and ordering for `list_posts`
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQuery {
    pub author_id: Option<u64>,
    pub order: SortOrder,
}

#[derive(Clone)]
pub struct RecordService {
    store: Arc<JsonStore>,
    tokens: TokenAuthority,
    delete_policy: DeletePolicy,
}

impl RecordService {
    pub fn new(store: Arc<JsonStore>, config: &CoreConfig) -> Self {
        Self {
            store,
            tokens: TokenAuthority::from_config(config),
            delete_policy: config.delete_policy,
        }
    }

    pub fn authenticate(&self, token: &str) -> Result<Caller> {
        authenticate(&self.tokens, token)
    }

    /// Length is checked on the raw body before anything is stored; the
    /// stored body is the masked one.
    pub fn create_post(&self, caller: &Caller, body: &str) -> Result<Post> {
        let length = body.chars().count();
        if length > MAX_POST_CHARS {
            return Err(Error::BodyTooLong {
                length,
                max: MAX_POST_CHARS,
            });
        }

        let post = self
            .store
            .create_post(caller.account_id(), &mask_denylisted(body))?;
        debug!("Account {} created post {}", caller.account_id(), post.id);
        Ok(post)
    }

    pub fn list_posts(&self, query: PostQuery) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .store
            .list_posts()?
            .into_iter()
            .filter(|p| query.author_id.map_or(true, |author| p.author_id == author))
            .collect();

        posts.sort_by_key(|p| p.id);
        if query.order == SortOrder::Descending {
            posts.reverse();
        }
        Ok(posts)
    }

    pub fn get_post(&self, id: u64) -> Result<Post> {
        self.store.get_post(id)
    }

    /// Only the author may delete. A missing post is a silent success unless
    /// the store runs with `DeletePolicy::Strict`.
    pub fn delete_post(&self, caller: &Caller, id: u64) -> Result<()> {
        let post = match self.store.get_post(id) {
            Ok(post) => post,
            Err(Error::NotFound) => {
                return match self.delete_policy {
                    DeletePolicy::Idempotent => Ok(()),
                    DeletePolicy::Strict => Err(Error::NotFound),
                };
            }
            Err(e) => return Err(e),
        };

        if post.author_id != caller.account_id() {
            return Err(Error::Forbidden);
        }

        // Posts are immutable and ids are never reissued, so the ownership
        // check above still holds here.
        self.store.delete_post(id)?;
        info!("Account {} deleted post {}", caller.account_id(), id);
        Ok(())
    }
}
