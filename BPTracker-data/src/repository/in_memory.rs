use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::errors::RepositoryError;
use super::records::RecordRepositoryTrait;
use crate::models::{timestamp_now, BPRecordChanges, BPRecordRow, NewBPRecord, RecordQuery, StatisticsRow, TimeBounds};

/// Everything the blob file holds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecordBlob {
    next_id: i64,
    records: Vec<BPRecordRow>,
}

/// In-memory record store, optionally mirrored to a JSON blob file after each write.
///
/// Used where no embedded database is available. Writes hold the lock until the blob
/// is on disk, so the file always reflects the latest state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordRepository {
    state: Arc<Mutex<RecordBlob>>,
    blob_path: Option<PathBuf>,
}

impl InMemoryRecordRepository {
    /// Create a volatile store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the blob at `path` if it exists; later writes are saved back to it
    pub async fn with_blob_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let blob = if fs::try_exists(&path).await? {
            let raw = fs::read_to_string(&path).await?;
            let blob: RecordBlob = serde_json::from_str(&raw)?;
            info!("Loaded {} records from {}", blob.records.len(), path.display());
            blob
        } else {
            RecordBlob::default()
        };

        Ok(Self {
            state: Arc::new(Mutex::new(blob)),
            blob_path: Some(path),
        })
    }

    async fn persist(&self, blob: &RecordBlob) -> Result<(), RepositoryError> {
        if let Some(path) = &self.blob_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await?;
                }
            }
            fs::write(path, serde_json::to_string(blob)?).await?;
            debug!("Saved record blob to {}", path.display());
        }
        Ok(())
    }

    fn sorted_within(blob: &RecordBlob, bounds: &TimeBounds) -> Vec<BPRecordRow> {
        let mut records: Vec<BPRecordRow> = blob
            .records
            .iter()
            .filter(|record| bounds.contains(&record.measured_at))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.measured_at.cmp(&a.measured_at).then(b.id.cmp(&a.id)));
        records
    }
}

#[async_trait]
impl RecordRepositoryTrait for InMemoryRecordRepository {
    async fn create(&self, input: NewBPRecord) -> Result<i64, RepositoryError> {
        let mut blob = self.state.lock().await;
        blob.next_id += 1;
        let id = blob.next_id;
        let now = timestamp_now();

        blob.records.push(BPRecordRow {
            id,
            systolic: input.systolic,
            diastolic: input.diastolic,
            pulse: input.pulse,
            measured_at: input.measured_at,
            note: input.note,
            image_path: input.image_path,
            created_at: now.clone(),
            updated_at: now,
        });
        self.persist(&blob).await?;
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BPRecordRow>, RepositoryError> {
        let blob = self.state.lock().await;
        Ok(blob.records.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, query: &RecordQuery) -> Result<Vec<BPRecordRow>, RepositoryError> {
        let blob = self.state.lock().await;
        let records = Self::sorted_within(&blob, &query.bounds);

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn latest(&self) -> Result<Option<BPRecordRow>, RepositoryError> {
        let blob = self.state.lock().await;
        Ok(Self::sorted_within(&blob, &TimeBounds::default()).into_iter().next())
    }

    async fn update(&self, id: i64, changes: BPRecordChanges) -> Result<bool, RepositoryError> {
        let mut blob = self.state.lock().await;
        let Some(record) = blob.records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };

        if let Some(systolic) = changes.systolic {
            record.systolic = systolic;
        }
        if let Some(diastolic) = changes.diastolic {
            record.diastolic = diastolic;
        }
        if let Some(pulse) = changes.pulse {
            record.pulse = pulse;
        }
        if let Some(measured_at) = changes.measured_at {
            record.measured_at = measured_at;
        }
        if let Some(note) = changes.note {
            record.note = note;
        }
        if let Some(image_path) = changes.image_path {
            record.image_path = image_path;
        }
        record.updated_at = timestamp_now();

        self.persist(&blob).await?;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut blob = self.state.lock().await;
        let before = blob.records.len();
        blob.records.retain(|r| r.id != id);
        let removed = blob.records.len() < before;
        if removed {
            self.persist(&blob).await?;
        }
        Ok(removed)
    }

    async fn statistics(&self, bounds: &TimeBounds) -> Result<StatisticsRow, RepositoryError> {
        let blob = self.state.lock().await;
        let records: Vec<&BPRecordRow> = blob
            .records
            .iter()
            .filter(|record| bounds.contains(&record.measured_at))
            .collect();

        if records.is_empty() {
            return Ok(StatisticsRow::default());
        }

        let total = records.len() as i64;
        let mut stats = StatisticsRow {
            total,
            max_systolic: i32::MIN,
            min_systolic: i32::MAX,
            max_diastolic: i32::MIN,
            min_diastolic: i32::MAX,
            max_pulse: i32::MIN,
            min_pulse: i32::MAX,
            ..StatisticsRow::default()
        };

        for record in &records {
            let (s, d, p) = (record.systolic, record.diastolic, record.pulse);
            stats.avg_systolic += f64::from(s);
            stats.avg_diastolic += f64::from(d);
            stats.avg_pulse += f64::from(p);
            stats.max_systolic = stats.max_systolic.max(s);
            stats.min_systolic = stats.min_systolic.min(s);
            stats.max_diastolic = stats.max_diastolic.max(d);
            stats.min_diastolic = stats.min_diastolic.min(d);
            stats.max_pulse = stats.max_pulse.max(p);
            stats.min_pulse = stats.min_pulse.min(p);

            if s < 120 && d < 80 {
                stats.normal_count += 1;
            }
            if (120..130).contains(&s) && d < 80 {
                stats.elevated_count += 1;
            }
            if s >= 130 || d >= 80 {
                stats.hypertension_count += 1;
            }
        }

        stats.avg_systolic /= total as f64;
        stats.avg_diastolic /= total as f64;
        stats.avg_pulse /= total as f64;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(systolic: i32, diastolic: i32, measured_at: &str) -> NewBPRecord {
        NewBPRecord {
            systolic,
            diastolic,
            pulse: 70,
            measured_at: measured_at.to_string(),
            note: None,
            image_path: None,
        }
    }

    #[tokio::test]
    async fn test_ids_increase_and_list_is_newest_first() {
        let repo = InMemoryRecordRepository::new();
        let first = repo.create(reading(118, 76, "2024-03-01T08:00:00.000Z")).await.unwrap();
        let second = repo.create(reading(125, 78, "2024-03-02T08:00:00.000Z")).await.unwrap();
        assert!(second > first);

        let records = repo.list(&RecordQuery::default()).await.unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(repo.latest().await.unwrap().unwrap().id, second);
    }

    #[tokio::test]
    async fn test_statistics_counts_bands() {
        let repo = InMemoryRecordRepository::new();
        repo.create(reading(118, 76, "2024-03-01T08:00:00.000Z")).await.unwrap();
        repo.create(reading(125, 78, "2024-03-02T08:00:00.000Z")).await.unwrap();
        repo.create(reading(120, 80, "2024-03-03T08:00:00.000Z")).await.unwrap();

        let stats = repo.statistics(&TimeBounds::default()).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!((stats.normal_count, stats.elevated_count, stats.hypertension_count), (1, 1, 1));
        assert_eq!((stats.min_systolic, stats.max_systolic), (118, 125));
        assert_eq!(stats.avg_pulse, 70.0);
    }

    #[tokio::test]
    async fn test_blob_file_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bp_records.json");

        let repo = InMemoryRecordRepository::with_blob_file(&path).await.unwrap();
        let id = repo.create(reading(132, 84, "2024-03-05T07:30:00.000Z")).await.unwrap();
        let changes = BPRecordChanges {
            note: Some(Some("after walk".to_string())),
            ..BPRecordChanges::default()
        };
        repo.update(id, changes).await.unwrap();

        let reloaded = InMemoryRecordRepository::with_blob_file(&path).await.unwrap();
        let record = reloaded.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.note.as_deref(), Some("after walk"));

        let next = reloaded.create(reading(120, 78, "2024-03-06T07:30:00.000Z")).await.unwrap();
        assert_eq!(next, id + 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_returns_false() {
        let repo = InMemoryRecordRepository::new();
        assert!(!repo.delete(1).await.unwrap());
    }
}
