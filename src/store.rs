use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::date_utils::format_date;
use crate::error::Result;
use crate::horoscope::{
    generate_daily_forecast, lucky_item, soul_question, DailyForecast, DailySeed, LuckyItem,
    SoulQuestion,
};
use crate::zodiac::ZodiacSign;

pub const KEY_PREFIX: &str = "horoscope_cache_";

// ---------- KEY/VALUE BACKEND ----------

/// String-keyed persistence the forecast store writes through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

// ---------- ENTRIES ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Daily,
    SoulQuestion,
    LuckyItem,
}

impl EntryKind {
    pub fn key(self) -> &'static str {
        match self {
            EntryKind::Daily => "daily",
            EntryKind::SoulQuestion => "soul_question",
            EntryKind::LuckyItem => "lucky_item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64, // ms since the Unix epoch
}

#[derive(Deserialize)]
struct Stamp {
    timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
    pub by_sign: BTreeMap<String, usize>,
    pub by_kind: BTreeMap<String, usize>,
}

// ---------- FORECAST STORE ----------

/// Expiring per-(sign, kind, day) entries on top of a `KeyValueStore`.
pub struct ForecastStore<S: KeyValueStore> {
    store: S,
    expiry_ms: i64,
}

impl<S: KeyValueStore> ForecastStore<S> {
    pub fn new(store: S, expiry_ms: i64) -> Self {
        Self { store, expiry_ms }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.forecast_expiry_ms())
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn expiry_ms(&self) -> i64 {
        self.expiry_ms
    }

    pub fn cache_key(sign: ZodiacSign, kind: EntryKind, date: NaiveDate) -> String {
        format!("{}{}_{}_{}", KEY_PREFIX, sign.name(), kind.key(), format_date(date))
    }

    fn is_fresh(&self, timestamp: i64, now_ms: i64) -> bool {
        timestamp > 0 && now_ms.saturating_sub(timestamp) < self.expiry_ms
    }

    /// Stored value if present and fresh. Expired and unreadable entries are
    /// dropped and reported as absent.
    pub fn get<T: DeserializeOwned>(
        &self,
        sign: ZodiacSign,
        kind: EntryKind,
        date: NaiveDate,
        now_ms: i64,
    ) -> Option<T> {
        let key = Self::cache_key(sign, kind, date);
        let raw = self.store.get(&key)?;

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) if self.is_fresh(entry.timestamp, now_ms) => {
                debug!(target: "forecast_store", "hit {}", key);
                Some(entry.data)
            }
            Ok(entry) => {
                warn!(target: "forecast_store", age_ms = now_ms.saturating_sub(entry.timestamp), "expired entry {}", key);
                self.store.remove(&key);
                None
            }
            Err(err) => {
                warn!(target: "forecast_store", "unreadable entry {}: {}", key, err);
                self.store.remove(&key);
                None
            }
        }
    }

    pub fn set<T: Serialize>(
        &self,
        sign: ZodiacSign,
        kind: EntryKind,
        date: NaiveDate,
        data: &T,
        now_ms: i64,
    ) -> Result<()> {
        let key = Self::cache_key(sign, kind, date);
        let raw = serde_json::to_string(&CacheEntry { data, timestamp: now_ms })?;
        self.store.set(&key, raw);
        debug!(target: "forecast_store", "stored {}", key);
        Ok(())
    }

    /// Removes one entry when both `kind` and `date` are given, every entry of
    /// `kind` for the sign when only `kind` is, and all of the sign's entries
    /// otherwise. Returns the number of keys removed.
    pub fn clear(&self, sign: ZodiacSign, kind: Option<EntryKind>, date: Option<NaiveDate>) -> usize {
        if let (Some(kind), Some(date)) = (kind, date) {
            let key = Self::cache_key(sign, kind, date);
            let existed = self.store.get(&key).is_some();
            self.store.remove(&key);
            return usize::from(existed);
        }

        let prefix = match kind {
            Some(kind) => format!("{}{}_{}_", KEY_PREFIX, sign.name(), kind.key()),
            None => format!("{}{}_", KEY_PREFIX, sign.name()),
        };
        self.remove_where(|key, _| key.starts_with(&prefix))
    }

    /// Drops every expired or unreadable entry under the store prefix.
    pub fn cleanup_expired(&self, now_ms: i64) -> usize {
        let removed = self.remove_where(|key, raw| {
            key.starts_with(KEY_PREFIX)
                && !matches!(
                    serde_json::from_str::<Stamp>(raw),
                    Ok(stamp) if self.is_fresh(stamp.timestamp, now_ms)
                )
        });
        if removed > 0 {
            debug!(target: "forecast_store", "cleaned up {} stale entries", removed);
        }
        removed
    }

    fn remove_where(&self, predicate: impl Fn(&str, &str) -> bool) -> usize {
        let doomed: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|key| {
                self.store
                    .get(key)
                    .map_or(false, |raw| predicate(key, &raw))
            })
            .collect();
        for key in &doomed {
            self.store.remove(key);
        }
        doomed.len()
    }

    /// True when a fresh daily forecast for `sign` on `date` is stored.
    pub fn is_generated(&self, sign: ZodiacSign, date: NaiveDate, now_ms: i64) -> bool {
        let key = Self::cache_key(sign, EntryKind::Daily, date);
        self.store
            .get(&key)
            .and_then(|raw| serde_json::from_str::<Stamp>(&raw).ok())
            .map_or(false, |stamp| self.is_fresh(stamp.timestamp, now_ms))
    }

    pub fn stats(&self, now_ms: i64) -> StoreStats {
        let mut stats = StoreStats::default();
        for key in self.store.keys() {
            let Some(rest) = key.strip_prefix(KEY_PREFIX) else {
                continue;
            };
            let Some(stamp) = self
                .store
                .get(&key)
                .and_then(|raw| serde_json::from_str::<Stamp>(&raw).ok())
            else {
                continue;
            };

            stats.total += 1;
            if self.is_fresh(stamp.timestamp, now_ms) {
                stats.valid += 1;
            } else {
                stats.expired += 1;
            }

            // {sign}_{kind}_{YYYY-MM-DD}; kinds may contain '_' but signs never do
            if let Some((sign, tail)) = rest.split_once('_') {
                if let Some((kind, _date)) = tail.rsplit_once('_') {
                    *stats.by_sign.entry(sign.to_string()).or_default() += 1;
                    *stats.by_kind.entry(kind.to_string()).or_default() += 1;
                }
            }
        }
        stats
    }

    // ---------- READ-THROUGH ----------

    fn read_through<T, F>(&self, sign: ZodiacSign, kind: EntryKind, date: NaiveDate, now_ms: i64, make: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.get(sign, kind, date, now_ms) {
            return cached;
        }
        let fresh = make();
        if let Err(err) = self.set(sign, kind, date, &fresh, now_ms) {
            warn!(target: "forecast_store", "could not store {:?} for {}: {}", kind, sign, err);
        }
        fresh
    }

    /// Stored forecast when fresh, otherwise a newly generated one (which is stored).
    pub fn daily_forecast_with_cache(&self, sign: ZodiacSign, date: NaiveDate, now_ms: i64) -> DailyForecast {
        self.read_through(sign, EntryKind::Daily, date, now_ms, || {
            generate_daily_forecast(sign, date)
        })
    }

    pub fn soul_question_with_cache(&self, sign: ZodiacSign, date: NaiveDate, now_ms: i64) -> SoulQuestion {
        self.read_through(sign, EntryKind::SoulQuestion, date, now_ms, || {
            soul_question(sign, &DailySeed::new(sign, date))
        })
    }

    pub fn lucky_item_with_cache(&self, sign: ZodiacSign, date: NaiveDate, now_ms: i64) -> LuckyItem {
        self.read_through(sign, EntryKind::LuckyItem, date, now_ms, || {
            lucky_item(sign, &DailySeed::new(sign, date))
        })
    }
}
