use crate::{RankingError, RankingStore, RankingStorage, Result, ScoreRecord};

/// Capability handle to a shared remote ranking table, scoped by mode.
///
/// The transport behind it is someone else's problem; implementations
/// return the top rows already ordered by the local comparator.
pub trait RemoteRanking {
    fn submit(&self, mode_key: &str, record: &ScoreRecord) -> Result<()>;
    fn fetch_top(&self, mode_key: &str) -> Result<Vec<ScoreRecord>>;
}

impl<S: RankingStorage> RankingStore<S> {
    /// Records locally, then forwards the same record to the remote table.
    ///
    /// The local sequence is committed before the remote call and is not
    /// rolled back when that call fails; the failure comes back alongside
    /// the sequence so the caller can show it as a warning.
    pub fn record_mirrored(
        &self,
        mode_key: &str,
        name: &str,
        score: u32,
        duration_secs: u32,
        remote: &dyn RemoteRanking,
    ) -> Result<(Vec<ScoreRecord>, Option<RankingError>)> {
        let record = ScoreRecord::new(name, score, duration_secs);
        let records = self.insert(mode_key, record.clone())?;

        let warning = remote.submit(mode_key, &record).err();
        if let Some(err) = &warning {
            log::warn!("remote score submission failed: {}", err);
        }

        Ok((records, warning))
    }
}
