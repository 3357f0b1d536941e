//! Per-address statistics and the leaderboard snapshot, persisted through a
//! [`KeyValueStore`].
//!
//! Two kinds of key are written:
//! - `<namespace>-stats-<address>`: JSON [`GameStats`] for one player
//! - `<namespace>-leaderboard`: JSON array of [`PlayerStats`]
//!
//! Entries that are missing or fail to parse read as empty. A malformed
//! leaderboard row only hides that row.
use crate::{
    leaderboard::{
        self,
        LeaderboardView,
        SortKey,
    },
    stats::{
        GameStats,
        PlayerStats,
    },
    storage::KeyValueStore,
};
use anyhow::{
    Context,
    ensure,
};
use serde::{
    Serialize,
    de::DeserializeOwned,
};
use serde_json::Value;

pub const DEFAULT_NAMESPACE: &str = "craps";

pub struct Ledger<S> {
    store: S,
    namespace: String,
}

impl<S> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats_key(&self, address: &str) -> String {
        format!("{}-stats-{}", self.namespace, address)
    }

    pub fn leaderboard_key(&self) -> String {
        format!("{}-leaderboard", self.namespace)
    }
}

impl<S: KeyValueStore> Ledger<S> {
    /// Stats for `address`, all zero when nothing usable is stored.
    pub fn load_record(&self, address: &str) -> crate::Result<GameStats> {
        Ok(self
            .load_json::<GameStats>(&self.stats_key(address))?
            .unwrap_or_default())
    }

    /// Count one finished round for `address` and refresh its leaderboard
    /// entry in the same update.
    pub fn record_result(
        &mut self,
        address: &str,
        won: bool,
        amount: f64,
    ) -> crate::Result<GameStats> {
        ensure!(
            amount.is_finite() && amount >= 0.0,
            "wager amount must be a non-negative number, got {amount}"
        );
        let mut stats = self.load_record(address)?;
        stats.record(won, amount);
        let key = self.stats_key(address);
        self.save_json(&key, &stats)?;
        self.upsert_leaderboard(address, &stats)?;
        tracing::debug!(
            address,
            won,
            amount,
            games_played = stats.games_played,
            "recorded round result"
        );
        Ok(stats)
    }

    /// Replace the snapshot entry for `address`, or append one. Rows that
    /// fail to parse are written back untouched.
    pub fn upsert_leaderboard(
        &mut self,
        address: &str,
        stats: &GameStats,
    ) -> crate::Result<()> {
        let mut rows = self.leaderboard_rows()?;
        let entry = serde_json::to_value(PlayerStats::new(address, stats.clone()))
            .context("serialize leaderboard row")?;
        match rows
            .iter_mut()
            .find(|row| row.get("address").and_then(Value::as_str) == Some(address))
        {
            Some(row) => *row = entry,
            None => rows.push(entry),
        }
        let key = self.leaderboard_key();
        self.save_json(&key, &rows)
    }

    /// The stored snapshot in write order, unfiltered. Malformed rows are
    /// skipped.
    pub fn leaderboard_snapshot(&self) -> crate::Result<Vec<PlayerStats>> {
        let key = self.leaderboard_key();
        let entries = self
            .leaderboard_rows()?
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<PlayerStats>(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(
                        key = %key,
                        error = %e,
                        "skipping malformed leaderboard row"
                    );
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    /// Every player with at least one game, sorted descending by `key`.
    pub fn list_leaderboard(&self, key: SortKey) -> crate::Result<Vec<PlayerStats>> {
        Ok(leaderboard::rank(self.leaderboard_snapshot()?, key))
    }

    /// The head of [`Self::list_leaderboard`] shown to players.
    pub fn top_leaderboard(&self, key: SortKey) -> crate::Result<LeaderboardView> {
        Ok(LeaderboardView::from_ranked(self.list_leaderboard(key)?))
    }

    fn leaderboard_rows(&self) -> crate::Result<Vec<Value>> {
        Ok(self
            .load_json::<Vec<Value>>(&self.leaderboard_key())?
            .unwrap_or_default())
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed ledger entry");
                Ok(None)
            }
        }
    }

    fn save_json<T: Serialize>(&mut self, key: &str, value: &T) -> crate::Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("serialize ledger entry {key}"))?;
        self.store.put(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::{
        leaderboard::LEADERBOARD_DISPLAY_LIMIT,
        storage::InMemoryStore,
    };
    use proptest::prelude::*;

    const ALICE: &str = "0xa11ce00000000000000000000000000000000001";
    const BOB: &str = "0xb0b0000000000000000000000000000000000002";

    fn ledger() -> Ledger<InMemoryStore> {
        Ledger::new(InMemoryStore::new())
    }

    #[test]
    fn load_record__defaults_to_zero_when_absent() {
        assert_eq!(ledger().load_record(ALICE).unwrap(), GameStats::default());
    }

    #[test]
    fn record_result__creates_then_updates_record() {
        // given
        let mut ledger = ledger();

        // when
        ledger.record_result(ALICE, true, 0.02).unwrap();
        let stats = ledger.record_result(ALICE, false, 0.01).unwrap();

        // then
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.games_lost, 1);
        assert_eq!(ledger.load_record(ALICE).unwrap(), stats);
    }

    #[test]
    fn record_result__writes_expected_keys() {
        // given
        let store = InMemoryStore::new();
        let mut ledger = Ledger::with_namespace(store.clone(), "street");

        // when
        ledger.record_result(ALICE, true, 0.5).unwrap();

        // then
        let entries = store.entries();
        let guard = entries.lock().unwrap();
        let mut keys: Vec<_> = guard.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["street-leaderboard".to_string(), format!("street-stats-{ALICE}")]
        );
    }

    #[test]
    fn record_result__keeps_one_leaderboard_entry_per_address() {
        // given
        let mut ledger = ledger();

        // when
        ledger.record_result(ALICE, true, 0.1).unwrap();
        ledger.record_result(BOB, false, 0.2).unwrap();
        ledger.record_result(ALICE, true, 0.1).unwrap();

        // then
        let snapshot = ledger.leaderboard_snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].address, ALICE);
        assert_eq!(snapshot[0].stats.games_won, 2);
        assert_eq!(snapshot[1].address, BOB);
    }

    #[test]
    fn record_result__rejects_negative_amount_without_writing() {
        let mut ledger = ledger();
        assert!(ledger.record_result(ALICE, true, -1.0).is_err());
        assert!(ledger.leaderboard_snapshot().unwrap().is_empty());
    }

    #[test]
    fn malformed_entries__read_as_empty() {
        // given
        let mut store = InMemoryStore::new();
        store.put(&format!("craps-stats-{ALICE}"), "{not json").unwrap();
        store.put("craps-leaderboard", "42").unwrap();
        let mut ledger = Ledger::new(store);

        // when
        let stats = ledger.load_record(ALICE).unwrap();
        let snapshot = ledger.leaderboard_snapshot().unwrap();
        let updated = ledger.record_result(ALICE, true, 0.01).unwrap();

        // then
        assert_eq!(stats, GameStats::default());
        assert!(snapshot.is_empty());
        assert_eq!(updated.games_played, 1);
        assert_eq!(ledger.leaderboard_snapshot().unwrap().len(), 1);
    }

    #[test]
    fn malformed_leaderboard_row__does_not_drop_other_rows() {
        // given
        let mut store = InMemoryStore::new();
        let valid = serde_json::to_value(PlayerStats::new(
            ALICE,
            GameStats {
                games_played: 1,
                games_won: 1,
                games_lost: 0,
                total_won: 0.02,
                total_lost: 0.0,
            },
        ))
        .unwrap();
        let broken = serde_json::json!({"address": "0xbad", "stats": {"gamesPlayed": 1}});
        store
            .put("craps-leaderboard", &Value::Array(vec![valid, broken.clone()]).to_string())
            .unwrap();
        let mut ledger = Ledger::new(store.clone());

        // when
        let before = ledger.leaderboard_snapshot().unwrap();
        ledger.record_result(BOB, true, 0.01).unwrap();

        // then
        let after: Vec<_> = ledger
            .leaderboard_snapshot()
            .unwrap()
            .into_iter()
            .map(|entry| entry.address)
            .collect();
        assert_eq!(before.len(), 1);
        assert_eq!(after, vec![ALICE.to_string(), BOB.to_string()]);
        let raw = store.get("craps-leaderboard").unwrap().unwrap();
        let rows: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], broken);
    }

    #[test]
    fn upsert_leaderboard__replaces_malformed_row_for_same_address() {
        // given
        let mut store = InMemoryStore::new();
        store
            .put("craps-leaderboard", &format!(r#"[{{"address":"{ALICE}","stats":7}}]"#))
            .unwrap();
        let mut ledger = Ledger::new(store);

        // when
        ledger.record_result(ALICE, false, 0.01).unwrap();

        // then
        let snapshot = ledger.leaderboard_snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].address, ALICE);
        assert_eq!(snapshot[0].stats.games_lost, 1);
    }

    #[test]
    fn list_leaderboard__filters_unplayed_entries() {
        // given
        let mut ledger = ledger();
        ledger.upsert_leaderboard(BOB, &GameStats::default()).unwrap();
        ledger.record_result(ALICE, false, 0.01).unwrap();

        // when
        let listed = ledger.list_leaderboard(SortKey::NetEth).unwrap();

        // then
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].address, ALICE);
    }

    #[test]
    fn top_leaderboard__caps_at_display_limit() {
        // given
        let mut ledger = ledger();
        for i in 0..15u32 {
            let address = format!("0x{i:040x}");
            for _ in 0..=i {
                ledger.record_result(&address, true, 0.01).unwrap();
            }
        }

        // when
        let top = ledger.top_leaderboard(SortKey::GamesPlayed).unwrap();
        let full = ledger.list_leaderboard(SortKey::GamesPlayed).unwrap();

        // then
        assert_eq!(full.len(), 15);
        assert_eq!(top.total_players, 15);
        assert_eq!(top.entries.len(), LEADERBOARD_DISPLAY_LIMIT);
        assert_eq!(top.entries[0].stats.games_played, 15);
        assert_eq!(top.entries[9].stats.games_played, 6);
    }

    proptest! {
        #[test]
        fn record_result__totals_match_signed_wager_sum(
            rounds in proptest::collection::vec((any::<bool>(), 1u32..10_000), 1..60)
        ) {
            let mut ledger = ledger();
            let mut signed_sum = 0.0;
            for (won, cents) in &rounds {
                let amount = *cents as f64 / 1000.0;
                ledger.record_result(ALICE, *won, amount).unwrap();
                signed_sum += if *won { amount } else { -amount };
            }
            let stats = ledger.load_record(ALICE).unwrap();
            prop_assert_eq!(stats.games_played, rounds.len() as u64);
            prop_assert_eq!(stats.games_played, stats.games_won + stats.games_lost);
            prop_assert!((stats.net() - signed_sum).abs() < 1e-6);
        }
    }
}
