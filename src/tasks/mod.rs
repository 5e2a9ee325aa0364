mod cache_cleanup;

pub use cache_cleanup::CacheCleanupTask;
