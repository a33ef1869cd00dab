use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::config::PostConfig;

use super::models::PendingPost;

/// 内存中的待确认帖子，按 TTL 自动过期。
#[derive(Clone)]
pub struct PostStore {
    cache: Cache<String, Arc<PendingPost>>,
}

impl PostStore {
    pub fn new(cfg: &PostConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(cfg.max_sessions)
            .time_to_live(Duration::from_secs(cfg.session_ttl_secs.max(1)))
            .build();
        Self { cache }
    }

    /// 保存并分配新 ID
    pub async fn insert(&self, post: PendingPost) -> String {
        let id = Uuid::new_v4().to_string();
        self.cache.insert(id.clone(), Arc::new(post)).await;
        id
    }

    pub async fn get(&self, id: &str) -> Option<Arc<PendingPost>> {
        self.cache.get(id).await
    }

    /// 移除并返回；不存在返回 None
    pub async fn take(&self, id: &str) -> Option<Arc<PendingPost>> {
        self.cache.remove(id).await
    }

    /// 把取走的帖子按原 ID 放回（TTL 重新计时）
    pub async fn restore(&self, id: &str, post: Arc<PendingPost>) {
        self.cache.insert(id.to_string(), post).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> PendingPost {
        PendingPost {
            caption: "<b>T</b>\nS".to_string(),
            poster_url: "http://poster.test/a.png".to_string(),
            year_text: "2022".to_string(),
            duration_text: "1 часов".to_string(),
        }
    }

    #[tokio::test]
    async fn take_consumes_entry() {
        let store = PostStore::new(&PostConfig::default());
        let id = store.insert(pending()).await;
        assert!(store.get(&id).await.is_some());
        assert_eq!(store.take(&id).await.map(|p| p.year_text.clone()), Some("2022".to_string()));
        assert!(store.take(&id).await.is_none());
    }

    #[tokio::test]
    async fn restored_entry_keeps_its_id() {
        let store = PostStore::new(&PostConfig::default());
        let id = store.insert(pending()).await;
        let taken = store.take(&id).await.expect("pending");
        store.restore(&id, taken).await;
        assert_eq!(store.get(&id).await.map(|p| p.caption.clone()), Some("<b>T</b>\nS".to_string()));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let store = PostStore::new(&PostConfig {
            session_ttl_secs: 1,
            max_sessions: 10,
        });
        let id = store.insert(pending()).await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(store.get(&id).await.is_none());
    }
}
