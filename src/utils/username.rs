use std::sync::RwLock;
use std::time::Duration;

use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;

/// Expected capacity and false-positive rate.
/// Tune these based on real user counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static USERNAME_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// true  => username is TAKEN
/// false => username is AVAILABLE (only taken names are stored)
static USERNAME_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

#[inline]
fn normalize(username: &str) -> String {
    username.to_lowercase()
}

/// Record a freshly registered username in both layers.
pub async fn mark_taken(username: &str) {
    let username = normalize(username);
    USERNAME_FILTER
        .write()
        .expect("username filter poisoned")
        .add(&username);
    USERNAME_CACHE.insert(username, true).await;
}

/// true  => username AVAILABLE
/// false => username TAKEN
///
/// Cuckoo filter gives a fast negative, moka a fast positive, the
/// database settles the rest.
pub async fn is_available(username: &str, pool: &MySqlPool) -> bool {
    let username = normalize(username);

    if !USERNAME_FILTER
        .read()
        .expect("username filter poisoned")
        .contains(&username)
    {
        return true;
    }

    if USERNAME_CACHE.get(&username).await.unwrap_or(false) {
        return false;
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? LIMIT 1)",
    )
    .bind(&username)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// Warm up the filter with every known username and the cache with the
/// recently active ones, streaming in batches.
pub async fn warmup(pool: &MySqlPool, recent_days: u32, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT username FROM users").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (username,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&username));
        total += 1;

        if batch.len() == batch_size {
            insert_filter_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_filter_batch(&batch);
    }

    tracing::info!(total, "Username filter warmup complete");

    let mut recent = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT username
        FROM users
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        ORDER BY last_login_at DESC
        "#,
    )
    .bind(recent_days)
    .fetch(pool);

    let mut cached = 0usize;
    let mut cache_batch = Vec::with_capacity(batch_size);

    while let Some(row) = recent.next().await {
        let (username,) = row?;
        cache_batch.push(normalize(&username));
        cached += 1;

        if cache_batch.len() >= batch_size {
            cache_batch_mark(&cache_batch).await;
            cache_batch.clear();
        }
    }

    if !cache_batch.is_empty() {
        cache_batch_mark(&cache_batch).await;
    }

    tracing::info!(cached, recent_days, "Username cache warmup complete");

    Ok(())
}

fn insert_filter_batch(usernames: &[String]) {
    let mut filter = USERNAME_FILTER.write().expect("username filter poisoned");

    for username in usernames {
        filter.add(username);
    }
}

async fn cache_batch_mark(usernames: &[String]) {
    let futures: Vec<_> = usernames
        .iter()
        .map(|u| USERNAME_CACHE.insert(u.clone(), true))
        .collect();

    futures::future::join_all(futures).await;
}
