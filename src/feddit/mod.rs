pub mod client;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;

pub use client::FedditClient;
pub use types::{Comment, Subfeddit};

/// Read access to the remote forum: groups and their comments.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn subfeddits(&self, limit: u32, skip: u32) -> Result<Vec<Subfeddit>>;

    async fn comments(&self, subfeddit_id: i64, limit: u32, skip: u32) -> Result<Vec<Comment>>;
}
