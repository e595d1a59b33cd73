use tracing::info;

use crate::cache::SharedCache;
use crate::command::{BoxFuture, Command, Message, Reply};
use crate::error::PluginResult;

/// `.collect` drops expired entries from the feed cache.
pub struct CollectCommand {
    cache: SharedCache,
}

impl CollectCommand {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }

    pub async fn collect(&self) -> String {
        let mut cache = self.cache.lock().await;
        let total = cache.len();
        let evicted = cache.evict_expired();
        info!(evicted, total, "Collected feed cache");
        format!("Collected {} objects out of {}.", evicted, total)
    }
}

impl Command for CollectCommand {
    fn name(&self) -> &str {
        "collect"
    }

    fn triggers(&self) -> &[&'static str] {
        &["collect"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        _message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move { Ok(Some(Reply::Say(self.collect().await))) })
    }
}
