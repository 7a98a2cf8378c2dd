use async_trait::async_trait;

/// String key-value persistence for client-side state such as drafts.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
