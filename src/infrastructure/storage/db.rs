use crate::domain::error::TranslateError;
use crate::domain::model::{ActivityDay, CustomFieldDef, TranslationRecord};
use std::collections::BTreeMap;
use std::path::Path;
use tokio_rusqlite::{params, Connection};

const ACTIVITY_WINDOW_DAYS: i64 = 30;

pub async fn init_database(db_path: &Path) -> Result<Connection, TranslateError> {
    let db = Connection::open(db_path.to_path_buf()).await?;
    create_schema(&db).await?;
    Ok(db)
}

pub async fn init_memory_database() -> Result<Connection, TranslateError> {
    let db = Connection::open_in_memory().await?;
    create_schema(&db).await?;
    Ok(db)
}

async fn create_schema(db: &Connection) -> Result<(), TranslateError> {
    db.call(|conn| {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                invoice_name TEXT NOT NULL,
                item_code TEXT NOT NULL,
                original_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                target_language TEXT NOT NULL,
                ai_provider TEXT NOT NULL,
                modified INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_translations_modified ON translations(modified)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS custom_fields (
                doctype TEXT NOT NULL,
                fieldname TEXT NOT NULL,
                label TEXT NOT NULL,
                fieldtype TEXT NOT NULL,
                options TEXT,
                default_value TEXT,
                insert_after TEXT NOT NULL,
                read_only INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (doctype, fieldname)
            )",
            [],
        )?;

        Ok(())
    })
    .await?;

    Ok(())
}

fn insert_records(
    tx: &rusqlite::Transaction<'_>,
    records: &[TranslationRecord],
) -> rusqlite::Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO translations
         (invoice_name, item_code, original_text, translated_text, target_language, ai_provider, modified)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )?;
    for r in records {
        stmt.execute(params![
            r.invoice_name,
            r.item_code,
            r.original_text,
            r.translated_text,
            r.target_language,
            r.ai_provider,
            r.modified
        ])?;
    }
    Ok(records.len())
}

/// Translation log and custom-field registry.
#[derive(Clone)]
pub struct TranslationStore {
    conn: Connection,
}

impl TranslationStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Append applied translations; returns how many rows were written.
    pub async fn record_translations(
        &self,
        records: Vec<TranslationRecord>,
    ) -> Result<usize, TranslateError> {
        if records.is_empty() {
            return Ok(0);
        }

        let written = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let count = insert_records(&tx, &records)?;
                tx.commit()?;
                Ok(count)
            })
            .await?;

        Ok(written)
    }

    /// Make the log mirror one saved invoice: its old rows are replaced by `records`.
    ///
    /// Delete and insert share one transaction, so a failed insert keeps the old rows.
    pub async fn sync_invoice(
        &self,
        invoice_name: &str,
        records: Vec<TranslationRecord>,
    ) -> Result<usize, TranslateError> {
        let name = invoice_name.to_string();
        let written = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM translations WHERE invoice_name = ?", params![name])?;
                let count = insert_records(&tx, &records)?;
                tx.commit()?;
                Ok(count)
            })
            .await?;

        Ok(written)
    }

    pub async fn count_translations(&self) -> Result<usize, TranslateError> {
        let count: i64 = self
            .conn
            .call(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM translations WHERE translated_text != ''",
                    [],
                    |row| row.get(0),
                )
            })
            .await?;
        Ok(count as usize)
    }

    pub async fn provider_counts(&self) -> Result<BTreeMap<String, usize>, TranslateError> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT ai_provider, COUNT(*) FROM translations
                     WHERE translated_text != '' GROUP BY ai_provider",
                )?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(provider, count)| (provider, count as usize))
            .collect())
    }

    /// Per-day counts over the last 30 days, newest first.
    pub async fn recent_activity(&self, now: i64) -> Result<Vec<ActivityDay>, TranslateError> {
        let since = now - ACTIVITY_WINDOW_DAYS * 24 * 60 * 60;
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT date(modified, 'unixepoch') AS day, COUNT(*) FROM translations
                     WHERE translated_text != '' AND modified >= ?
                     GROUP BY day ORDER BY day DESC LIMIT 30",
                )?;
                let rows = stmt
                    .query_map(params![since], |row| {
                        Ok(ActivityDay {
                            date: row.get(0)?,
                            count: row.get::<_, i64>(1)? as usize,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    pub async fn export(&self) -> Result<Vec<TranslationRecord>, TranslateError> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT invoice_name, item_code, original_text, translated_text,
                            target_language, ai_provider, modified
                     FROM translations WHERE translated_text != ''
                     ORDER BY modified DESC, id DESC",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(TranslationRecord {
                            invoice_name: row.get(0)?,
                            item_code: row.get(1)?,
                            original_text: row.get(2)?,
                            translated_text: row.get(3)?,
                            target_language: row.get(4)?,
                            ai_provider: row.get(5)?,
                            modified: row.get(6)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    pub async fn clear(&self) -> Result<usize, TranslateError> {
        let removed = self
            .conn
            .call(|conn| conn.execute("DELETE FROM translations", []))
            .await?;
        Ok(removed)
    }

    /// Insert the missing field definitions in one transaction.
    ///
    /// Existing definitions are left untouched; returns how many were added.
    pub async fn create_custom_fields(
        &self,
        fields: Vec<CustomFieldDef>,
    ) -> Result<usize, TranslateError> {
        let added = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut added = 0;
                for f in &fields {
                    added += tx.execute(
                        "INSERT OR IGNORE INTO custom_fields
                         (doctype, fieldname, label, fieldtype, options, default_value, insert_after, read_only)
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                        params![
                            f.doctype,
                            f.fieldname,
                            f.label,
                            f.fieldtype,
                            f.options,
                            f.default_value,
                            f.insert_after,
                            f.read_only
                        ],
                    )?;
                }
                // dropping an uncommitted transaction rolls it back
                tx.commit()?;
                Ok(added)
            })
            .await?;
        Ok(added)
    }

    pub async fn has_custom_fields(&self, fields: &[CustomFieldDef]) -> Result<bool, TranslateError> {
        let wanted: Vec<(String, String)> = fields
            .iter()
            .map(|f| (f.doctype.clone(), f.fieldname.clone()))
            .collect();
        let present = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT 1 FROM custom_fields WHERE doctype = ? AND fieldname = ?")?;
                for (doctype, fieldname) in &wanted {
                    if !stmt.exists(params![doctype, fieldname])? {
                        return Ok(false);
                    }
                }
                Ok(true)
            })
            .await?;
        Ok(present)
    }
}
