// std
use std::{env, fs, path::PathBuf, process};
// self
use token_gate::{
	_preludet::*,
	cache::{FileCache, MemoryCache, TokenCache},
};

fn temp_path() -> PathBuf {
	let unique = format!(
		"token_gate_file_cache_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}

#[tokio::test]
async fn memory_cache_round_trips_live_entries() {
	let cache = MemoryCache::default();

	cache.set("app_accesstoken", "T1", Duration::seconds(60)).await.expect("Set should succeed.");

	let fetched = cache.get("app_accesstoken").await.expect("Get should succeed.");

	assert_eq!(fetched.as_deref(), Some("T1"));

	let ttl = cache.remaining_ttl("app_accesstoken").expect("Live entry should carry a TTL.");

	assert!(ttl > Duration::seconds(55));
	assert!(ttl <= Duration::seconds(60));
}

#[tokio::test]
async fn memory_cache_reports_expired_entries_as_absent() {
	let cache = MemoryCache::default();

	cache.set("app_accesstoken", "T1", Duration::ZERO).await.expect("Set should succeed.");

	assert_eq!(cache.get("app_accesstoken").await.expect("Get should succeed."), None);
	assert_eq!(cache.remaining_ttl("app_accesstoken"), None);
}

#[tokio::test]
async fn memory_cache_delete_reports_whether_a_live_entry_existed() {
	let cache = MemoryCache::default();

	cache.set("app_accesstoken", "T1", Duration::seconds(60)).await.expect("Set should succeed.");

	assert!(cache.delete("app_accesstoken").await.expect("First delete should succeed."));
	assert!(!cache.delete("app_accesstoken").await.expect("Second delete should succeed."));

	cache.set("app_accesstoken", "T1", Duration::ZERO).await.expect("Set should succeed.");

	// Removing an already-dead entry is not a live deletion.
	assert!(!cache.delete("app_accesstoken").await.expect("Delete of dead entry should succeed."));
}

#[tokio::test]
async fn file_cache_survives_a_reopen() {
	let path = temp_path();
	let cache = FileCache::open(&path).expect("File cache should open.");

	cache.set("app_accesstoken", "T1", Duration::seconds(600)).await.expect("Set should succeed.");
	drop(cache);

	let reopened = FileCache::open(&path).expect("File cache should reopen.");
	let fetched = reopened.get("app_accesstoken").await.expect("Get should succeed.");

	assert_eq!(fetched.as_deref(), Some("T1"));
	assert!(reopened.delete("app_accesstoken").await.expect("Delete should succeed."));
	assert_eq!(reopened.get("app_accesstoken").await.expect("Get should succeed."), None);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary cache snapshot {}: {e}", path.display())
	});
}

#[tokio::test]
async fn file_cache_prunes_expired_entries_on_open() {
	let path = temp_path();
	let cache = FileCache::open(&path).expect("File cache should open.");

	cache.set("dead", "T1", Duration::ZERO).await.expect("Set should succeed.");
	cache.set("live", "T2", Duration::seconds(600)).await.expect("Set should succeed.");
	drop(cache);

	let reopened = FileCache::open(&path).expect("File cache should reopen.");

	assert_eq!(reopened.get("dead").await.expect("Get should succeed."), None);
	assert_eq!(reopened.get("live").await.expect("Get should succeed.").as_deref(), Some("T2"));

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary cache snapshot {}: {e}", path.display())
	});
}
