mod cache_helpers;

pub use self::cache_helpers::CacheStore;
