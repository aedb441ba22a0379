// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Gardens (registry and ownership)
//! - Activity records (the raw activity log)
//! - Garden totals (pre-computed aggregates)
//! - Fertilizer/pest detail rows (optional pre-joined data)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    ActivityRecord, BasicTotals, DetailedFertilizerRecord, DetailedPestRecord, Garden,
};
use crate::stats::classify;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Garden Operations ───────────────────────────────────────

    /// Get a garden by ID.
    pub async fn get_garden(&self, garden_id: &str) -> Result<Option<Garden>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GARDENS)
            .obj()
            .one(garden_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a garden.
    pub async fn upsert_garden(&self, garden: &Garden) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::GARDENS)
            .document_id(&garden.id)
            .object(garden)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Gardens owned by a user.
    pub async fn get_gardens_for_owner(&self, owner_id: &str) -> Result<Vec<Garden>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GARDENS)
            .filter(|q| q.field("owner_id").eq(owner_id))
            .order_by([("name", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every garden in the system.
    pub async fn list_gardens(&self) -> Result<Vec<Garden>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GARDENS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Activity Record Operations ──────────────────────────────

    /// All activity records of a garden.
    pub async fn get_records_for_garden(
        &self,
        garden_id: &str,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITY_RECORDS)
            .filter(|q| q.field("garden_id").eq(garden_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent records of a garden, newest first.
    pub async fn get_recent_records(
        &self,
        garden_id: &str,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITY_RECORDS)
            .filter(|q| q.field("garden_id").eq(garden_id))
            .order_by([("timestamp", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent records of several gardens.
    ///
    /// Each garden contributes up to `limit` records; the caller trims the
    /// merged feed.
    pub async fn get_recent_records_for_gardens(
        &self,
        garden_ids: &[String],
        limit: u32,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let batches = stream::iter(garden_ids.to_vec())
            .map(|garden_id| async move { self.get_recent_records(&garden_id, limit).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Vec<ActivityRecord>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Vec<ActivityRecord>>, AppError>>()?;

        Ok(batches.into_iter().flatten().collect())
    }

    /// Records across all gardens with a timestamp at or after `since` (RFC3339).
    pub async fn get_records_since(&self, since: &str) -> Result<Vec<ActivityRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITY_RECORDS)
            .filter(|q| q.field("timestamp").greater_than_or_equal(since))
            .order_by([("timestamp", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Detail Row Operations ───────────────────────────────────

    /// Pre-joined fertilizer rows for a garden (empty if none exist).
    pub async fn get_fertilizer_details(
        &self,
        garden_id: &str,
    ) -> Result<Vec<DetailedFertilizerRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FERTILIZER_DETAILS)
            .filter(|q| q.field("garden_id").eq(garden_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Pre-joined pest rows for a garden (empty if none exist).
    pub async fn get_pest_details(
        &self,
        garden_id: &str,
    ) -> Result<Vec<DetailedPestRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PEST_DETAILS)
            .filter(|q| q.field("garden_id").eq(garden_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Garden Totals Operations ────────────────────────────────

    /// Get the totals aggregate for a garden.
    pub async fn get_garden_totals(
        &self,
        garden_id: &str,
    ) -> Result<Option<BasicTotals>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GARDEN_TOTALS)
            .obj()
            .one(garden_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Totals for several gardens, keyed by garden ID. Gardens without a
    /// totals document are absent from the map.
    pub async fn get_totals_for_gardens(
        &self,
        garden_ids: &[String],
    ) -> Result<HashMap<String, BasicTotals>, AppError> {
        let found = stream::iter(garden_ids.to_vec())
            .map(|garden_id| async move {
                let totals = self.get_garden_totals(&garden_id).await?;
                Ok::<_, AppError>(totals.map(|t| (garden_id, t)))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<(String, BasicTotals)>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<(String, BasicTotals)>>, AppError>>()?;

        Ok(found.into_iter().flatten().collect())
    }

    /// Every totals document in the system.
    pub async fn list_garden_totals(&self) -> Result<Vec<BasicTotals>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GARDEN_TOTALS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Atomic Activity Logging ─────────────────────────────────

    /// Atomically store an activity record and update its garden's totals.
    ///
    /// Both reads go through the transaction, so a concurrent commit to the
    /// same record or totals document aborts this one instead of being
    /// overwritten.
    ///
    /// Returns `true` if the record was newly logged, `false` if a record
    /// with this ID already exists in the same garden (idempotent duplicate).
    /// A record ID already used by another garden is a conflict.
    pub async fn log_activity_atomic(&self, record: &ActivityRecord) -> Result<bool, AppError> {
        let garden_id = record.garden_id.clone();
        let record_id = record.id.clone();
        let now = chrono::Utc::now().to_rfc3339();

        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;
        let tx_client = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );

        // 1. An existing record with this ID decides the outcome
        let existing: Option<ActivityRecord> = tx_client
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITY_RECORDS)
            .obj()
            .one(&record_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read record in transaction: {}", e))
            })?;

        if let Some(existing) = existing {
            let _ = transaction.rollback().await;
            if existing.garden_id != garden_id {
                tracing::warn!(
                    garden_id = %garden_id,
                    owner_garden_id = %existing.garden_id,
                    record_id = %record_id,
                    "Record ID already used by another garden"
                );
                return Err(AppError::Conflict(format!(
                    "Record ID {} belongs to another garden",
                    record_id
                )));
            }
            tracing::debug!(
                garden_id = %garden_id,
                record_id = %record_id,
                "Record already logged (idempotent skip)"
            );
            return Ok(false);
        }

        // 2. Read current totals and fold the record in
        let current: Option<BasicTotals> = tx_client
            .fluent()
            .select()
            .by_id_in(collections::GARDEN_TOTALS)
            .obj()
            .one(&garden_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read totals in transaction: {}", e))
            })?;

        let mut totals = current.unwrap_or_else(|| BasicTotals::for_garden(&garden_id));
        totals.update_from_record(&classify(record), &now);

        // 3. Add record write to transaction
        client
            .fluent()
            .update()
            .in_col(collections::ACTIVITY_RECORDS)
            .document_id(&record_id)
            .object(record)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add record to transaction: {}", e))
            })?;

        // 4. Add totals write to transaction
        client
            .fluent()
            .update()
            .in_col(collections::GARDEN_TOTALS)
            .document_id(&garden_id)
            .object(&totals)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add totals to transaction: {}", e))
            })?;

        // 5. Commit
        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            garden_id = %garden_id,
            record_id = %record_id,
            total_records = totals.total_records,
            "Activity logged atomically"
        );

        Ok(true)
    }
}
