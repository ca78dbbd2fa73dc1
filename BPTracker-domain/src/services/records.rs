use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use bp_tracker_data::repository::{RecordRepositoryTrait, SettingsRepositoryTrait};

use crate::entities::conversions::{
    convert_to_data_bounds, convert_to_data_new_record, convert_to_data_record_changes, convert_to_data_record_query,
    convert_to_domain_record, convert_to_domain_settings, convert_to_domain_statistics,
};
use crate::entities::{BPRecord, BPRecordInput, BPRecordPatch, BPStatistics, BPStatusInfo, BPThreshold, DateRange, RecordFilter};
use crate::errors::ServiceError;
use crate::notifications::{abnormal_alert_content, Notifier};
use crate::services::classification::{classify_record, should_alert};
use crate::services::date_range::resolve_bounds;
use crate::services::validation::validate_values;

/// Record operations exposed to the shell
#[async_trait]
pub trait RecordServiceTrait: Send + Sync {
    /// Validate and store a reading, alerting when it is abnormal
    async fn create(&self, input: BPRecordInput) -> Result<BPRecord, ServiceError>;

    async fn get(&self, id: i64) -> Result<BPRecord, ServiceError>;

    /// Records matching the filter, newest first
    async fn list(&self, filter: &RecordFilter) -> Result<Vec<BPRecord>, ServiceError>;

    async fn latest(&self) -> Result<Option<BPRecord>, ServiceError>;

    /// Latest record for a dashboard. Failures are logged and read as "no record".
    async fn latest_or_none(&self) -> Option<BPRecord>;

    async fn update(&self, id: i64, patch: BPRecordPatch) -> Result<BPRecord, ServiceError>;

    async fn delete(&self, id: i64) -> Result<(), ServiceError>;

    async fn statistics(&self, filter: &RecordFilter) -> Result<BPStatistics, ServiceError>;

    /// Records matching the filter, oldest first
    async fn chart_data(&self, filter: &RecordFilter) -> Result<Vec<BPRecord>, ServiceError>;

    /// Status of a record against the stored threshold
    async fn classify_record(&self, record: &BPRecord) -> Result<&'static BPStatusInfo, ServiceError>;
}

pub struct RecordService {
    records: Arc<dyn RecordRepositoryTrait>,
    settings: Arc<dyn SettingsRepositoryTrait>,
    notifier: Arc<dyn Notifier>,
}

impl RecordService {
    pub fn new(
        records: Arc<dyn RecordRepositoryTrait>,
        settings: Arc<dyn SettingsRepositoryTrait>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            records,
            settings,
            notifier,
        }
    }

    fn bounds(filter: &RecordFilter) -> Option<DateRange> {
        resolve_bounds(filter, &Local::now())
    }

    async fn threshold(&self) -> Result<BPThreshold, ServiceError> {
        let settings = convert_to_domain_settings(self.settings.settings().await?)?;
        Ok(settings.bp_threshold)
    }

    /// Fire the abnormal reading alert when enabled. Nothing here fails the save.
    async fn alert_if_abnormal(&self, record: &BPRecord) {
        let settings = match self.settings.settings().await {
            Ok(row) => match convert_to_domain_settings(row) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Skipping abnormal alert, settings unreadable: {}", err);
                    return;
                }
            },
            Err(err) => {
                warn!("Skipping abnormal alert, settings unavailable: {}", err);
                return;
            }
        };

        if !settings.abnormal_alert_enabled {
            return;
        }
        let status = classify_record(record, &settings.bp_threshold);
        if !should_alert(status) {
            return;
        }

        let content = abnormal_alert_content(record.systolic, record.diastolic, Some(record.id));
        match self.notifier.fire_immediate(&content).await {
            Ok(id) => info!("Abnormal reading alert {} sent for record {} ({})", id, record.id, status.as_str()),
            Err(err) => warn!("Abnormal reading alert for record {} failed: {}", record.id, err),
        }
    }
}

#[async_trait]
impl RecordServiceTrait for RecordService {
    async fn create(&self, input: BPRecordInput) -> Result<BPRecord, ServiceError> {
        validate_values(input.systolic, input.diastolic, input.pulse).into_result()?;

        let measured_at = input.measured_at.unwrap_or_else(Utc::now);
        let new_record = convert_to_data_new_record(
            input.systolic,
            input.diastolic,
            input.pulse,
            &measured_at,
            input.note,
            input.image_path,
        );
        let id = self.records.create(new_record).await?;
        info!("Created record {}", id);

        let record = self.get(id).await?;
        self.alert_if_abnormal(&record).await;
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<BPRecord, ServiceError> {
        let row = self
            .records
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Record", id))?;
        Ok(convert_to_domain_record(row)?)
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<BPRecord>, ServiceError> {
        let range = Self::bounds(filter);
        let query = convert_to_data_record_query(filter, range.as_ref());
        debug!("Listing records with {:?}", query);

        let rows = self.records.list(&query).await?;
        let records = rows
            .into_iter()
            .map(convert_to_domain_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn latest(&self) -> Result<Option<BPRecord>, ServiceError> {
        match self.records.latest().await? {
            Some(row) => Ok(Some(convert_to_domain_record(row)?)),
            None => Ok(None),
        }
    }

    async fn latest_or_none(&self) -> Option<BPRecord> {
        match self.latest().await {
            Ok(record) => record,
            Err(err) => {
                warn!("Latest record unavailable: {}", err);
                None
            }
        }
    }

    async fn update(&self, id: i64, patch: BPRecordPatch) -> Result<BPRecord, ServiceError> {
        let existing = self.get(id).await?;
        if patch.touches_values() {
            validate_values(
                patch.systolic.unwrap_or(existing.systolic),
                patch.diastolic.unwrap_or(existing.diastolic),
                patch.pulse.unwrap_or(existing.pulse),
            )
            .into_result()?;
        }

        if !self.records.update(id, convert_to_data_record_changes(patch)).await? {
            return Err(ServiceError::not_found("Record", id));
        }
        info!("Updated record {}", id);
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.records.delete(id).await? {
            return Err(ServiceError::not_found("Record", id));
        }
        info!("Deleted record {}", id);
        Ok(())
    }

    async fn statistics(&self, filter: &RecordFilter) -> Result<BPStatistics, ServiceError> {
        let bounds = convert_to_data_bounds(Self::bounds(filter).as_ref());
        let row = self.records.statistics(&bounds).await?;
        Ok(convert_to_domain_statistics(row))
    }

    async fn chart_data(&self, filter: &RecordFilter) -> Result<Vec<BPRecord>, ServiceError> {
        let mut records = self.list(filter).await?;
        records.reverse();
        Ok(records)
    }

    async fn classify_record(&self, record: &BPRecord) -> Result<&'static BPStatusInfo, ServiceError> {
        let threshold = self.threshold().await?;
        Ok(classify_record(record, &threshold).info())
    }
}
