/*!
 * Repository layer for record-store operations.
 *
 * This module provides the fetch/update surface the translation pipeline
 * uses, abstracting away the SQL details. Column names are always checked
 * against the per-kind whitelist before being interpolated into statements.
 */

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use log::debug;
use rusqlite::OptionalExtension;
use rusqlite::types::Value;

use super::connection::DatabaseConnection;
use super::models::{RecordKind, ScheduleSummary, TranslatableRecord};

/// Repository for record-store operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Access the underlying connection (stats, tests)
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Extra non-text columns that may be supplied when inserting a record
    fn insert_extras(kind: RecordKind) -> &'static [&'static str] {
        match kind {
            RecordKind::Schedule => &[
                "day_number",
                "date",
                "start_time",
                "end_time",
                "location",
                "category",
                "owner",
            ],
            RecordKind::Task => &["status", "owner"],
            RecordKind::Note => &["category"],
        }
    }

    /// Fetch all records of a kind in stable id order
    pub async fn fetch_all(&self, kind: RecordKind) -> Result<Vec<TranslatableRecord>> {
        self.db
            .execute_async(move |conn| {
                let columns = kind.text_columns();
                let sql = format!(
                    "SELECT id, {} FROM {} ORDER BY id",
                    columns.join(", "),
                    kind.table()
                );

                let mut stmt = conn.prepare(&sql)?;
                let records = stmt
                    .query_map([], |row| {
                        let id: i64 = row.get(0)?;
                        let mut fields = BTreeMap::new();
                        for (idx, column) in columns.iter().enumerate() {
                            let value: Option<String> = row.get(idx + 1)?;
                            fields.insert(column.clone(), value);
                        }
                        Ok(TranslatableRecord { id, fields })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                debug!("Fetched {} {} record(s)", records.len(), kind);
                Ok(records)
            })
            .await
    }

    /// Fetch one record by id
    pub async fn fetch_one(
        &self,
        kind: RecordKind,
        id: i64,
    ) -> Result<Option<TranslatableRecord>> {
        self.db
            .execute_async(move |conn| {
                let columns = kind.text_columns();
                let sql = format!(
                    "SELECT id, {} FROM {} WHERE id = ?1",
                    columns.join(", "),
                    kind.table()
                );

                let record = conn
                    .query_row(&sql, [id], |row| {
                        let id: i64 = row.get(0)?;
                        let mut fields = BTreeMap::new();
                        for (idx, column) in columns.iter().enumerate() {
                            let value: Option<String> = row.get(idx + 1)?;
                            fields.insert(column.clone(), value);
                        }
                        Ok(TranslatableRecord { id, fields })
                    })
                    .optional()?;

                Ok(record)
            })
            .await
    }

    /// Update a partial field set on one record.
    ///
    /// Column names are validated against the kind's text columns; unknown
    /// columns are rejected rather than interpolated.
    pub async fn update_fields(
        &self,
        kind: RecordKind,
        id: i64,
        updates: &BTreeMap<String, String>,
    ) -> Result<()> {
        if updates.is_empty() {
            return Err(anyhow!("No fields to update for {} record {}", kind, id));
        }

        let allowed = kind.text_columns();
        for column in updates.keys() {
            if !allowed.contains(column) {
                return Err(anyhow!(
                    "Column '{}' is not a translatable column of {}",
                    column,
                    kind.table()
                ));
            }
        }

        let updates = updates.clone();
        self.db
            .execute_async(move |conn| {
                let mut assignments = Vec::with_capacity(updates.len());
                let mut params: Vec<Value> = Vec::with_capacity(updates.len() + 1);

                for (idx, (column, value)) in updates.iter().enumerate() {
                    assignments.push(format!("{} = ?{}", column, idx + 1));
                    params.push(Value::Text(value.clone()));
                }
                params.push(Value::Integer(id));

                let sql = format!(
                    "UPDATE {} SET {}, updated_at = datetime('now') WHERE id = ?{}",
                    kind.table(),
                    assignments.join(", "),
                    params.len()
                );

                let changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
                if changed == 0 {
                    return Err(anyhow!("No {} record with id {}", kind, id));
                }

                debug!("Updated {} field(s) on {} record {}", updates.len(), kind, id);
                Ok(())
            })
            .await
    }

    /// Insert a record (seeding and tests; the pipeline itself never inserts)
    pub async fn insert(
        &self,
        kind: RecordKind,
        values: &BTreeMap<String, String>,
    ) -> Result<i64> {
        if !values.contains_key("title") {
            return Err(anyhow!("A {} record requires a title", kind));
        }

        let mut allowed = kind.text_columns();
        allowed.extend(Self::insert_extras(kind).iter().map(|c| c.to_string()));
        for column in values.keys() {
            if !allowed.contains(column) {
                return Err(anyhow!(
                    "Column '{}' is not an insertable column of {}",
                    column,
                    kind.table()
                ));
            }
        }

        let values = values.clone();
        self.db
            .execute_async(move |conn| {
                let columns: Vec<&str> = values.keys().map(|k| k.as_str()).collect();
                let placeholders: Vec<String> =
                    (1..=values.len()).map(|i| format!("?{}", i)).collect();
                let params: Vec<Value> =
                    values.values().map(|v| Value::Text(v.clone())).collect();

                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    kind.table(),
                    columns.join(", "),
                    placeholders.join(", ")
                );

                conn.execute(&sql, rusqlite::params_from_iter(params))?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Fetch schedule rows shaped for the chat assistant summary,
    /// ordered the way the dashboard displays them
    pub async fn fetch_schedule_summaries(&self) -> Result<Vec<ScheduleSummary>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT day_number, date, start_time, end_time, location, category, owner,
                           title, title_vi, description, description_vi
                    FROM itinerary
                    ORDER BY day_number, start_time
                    "#,
                )?;

                let rows = stmt
                    .query_map([], |row| {
                        Ok(ScheduleSummary {
                            day_number: row.get(0)?,
                            date: row.get(1)?,
                            start_time: row.get(2)?,
                            end_time: row.get(3)?,
                            location: row.get(4)?,
                            category: row.get(5)?,
                            owner: row.get(6)?,
                            title: row.get(7)?,
                            title_vi: row.get(8)?,
                            description: row.get(9)?,
                            description_vi: row.get(10)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(rows)
            })
            .await
    }
}
