use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;

use super::{MemoKey, MemoStore};
use crate::metrics::track_cache_operation;
use crate::models::question::ComparableResponse;

/// Evaluation memos in Redis, expiring after `ttl_seconds` so abandoned visits clean up.
#[derive(Clone)]
pub struct RedisMemoStore {
    redis: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisMemoStore {
    pub fn new(redis: ConnectionManager, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }
}

#[async_trait]
impl MemoStore for RedisMemoStore {
    async fn get_memo(&self, key: &MemoKey) -> Result<Option<ComparableResponse>> {
        let mut conn = self.redis.clone();
        let cached: Option<String> = track_cache_operation("get_memo", async {
            redis::cmd("GET")
                .arg(key.redis_key())
                .query_async(&mut conn)
                .await
                .context("Failed to read evaluation memo")
        })
        .await?;

        Ok(cached.map(ComparableResponse::new))
    }

    async fn put_memo(&self, key: &MemoKey, memo: &ComparableResponse) -> Result<()> {
        let mut conn = self.redis.clone();
        track_cache_operation("put_memo", async {
            redis::cmd("SETEX")
                .arg(key.redis_key())
                .arg(self.ttl_seconds)
                .arg(memo.as_str())
                .query_async::<()>(&mut conn)
                .await
                .context("Failed to store evaluation memo")
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .context("Redis ping failed")?;
        Ok(())
    }
}
