use async_trait::async_trait;
use jiff::Timestamp;
use redirgen_core::repository::{ReadRepository, Repository, Result};
use redirgen_core::{
    NewRedirect, Redirect, RedirectFlags, RedirectId, RedirectUpdate, StatusCode, StorageError,
    WILDCARD_HOST,
};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::{debug, info};

/// Columns selected for a [`Redirect`].
///
/// Numeric columns are cast so decoding does not depend on the exact integer
/// widths the host platform chose for its schema.
const SELECT_COLUMNS: &str = r#"
    CAST(uid AS UNSIGNED) AS uid,
    source_host,
    source_path,
    target,
    CAST(target_statuscode AS SIGNED) AS target_statuscode,
    CAST(keep_query_parameters AS SIGNED) AS keep_query_parameters,
    CAST(is_regexp AS SIGNED) AS is_regexp,
    CAST(force_https AS SIGNED) AS force_https,
    CAST(disable_hitcount AS SIGNED) AS disable_hitcount,
    CAST(respect_query_parameters AS SIGNED) AS respect_query_parameters,
    CAST(createdon AS SIGNED) AS createdon,
    CAST(updatedon AS SIGNED) AS updatedon,
    CAST(creation_type AS SIGNED) AS creation_type
"#;

/// MySQL implementation of the repository contract on the host platform's
/// `sys_redirect` table.
///
/// The table is owned by the host platform and is neither created nor
/// migrated here. Rows flagged as `deleted` are invisible to every read.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn get(&self, id: RedirectId) -> Result<Option<Redirect>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM sys_redirect WHERE uid = ? AND deleted = 0 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(redirect_from_row).transpose()
    }
}

fn parse_timestamp(column: &str, seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{seconds}': {e}"))
    })
}

fn flag(row: &MySqlRow, column: &str) -> Result<bool> {
    let value: i64 = row.try_get(column).map_err(map_sqlx_error)?;
    Ok(value != 0)
}

fn redirect_from_row(row: &MySqlRow) -> Result<Redirect> {
    let status_raw: i64 = row.try_get("target_statuscode").map_err(map_sqlx_error)?;
    let status_code = u16::try_from(status_raw)
        .map_err(|_| StorageError::InvalidData(format!("invalid status code {status_raw}")))
        .and_then(|code| {
            StatusCode::try_from(code).map_err(|e| StorageError::InvalidData(e.to_string()))
        })?;

    let creation_raw: i64 = row.try_get("creation_type").map_err(map_sqlx_error)?;
    let creation_type = u32::try_from(creation_raw).map_err(|_| {
        StorageError::InvalidData(format!("invalid creation type {creation_raw}"))
    })?;

    Ok(Redirect {
        id: row.try_get("uid").map_err(map_sqlx_error)?,
        source_host: row.try_get("source_host").map_err(map_sqlx_error)?,
        source_path: row.try_get("source_path").map_err(map_sqlx_error)?,
        target: row.try_get("target").map_err(map_sqlx_error)?,
        status_code,
        flags: RedirectFlags {
            keep_query_parameters: flag(row, "keep_query_parameters")?,
            is_regexp: flag(row, "is_regexp")?,
            force_https: flag(row, "force_https")?,
            disable_hitcount: flag(row, "disable_hitcount")?,
            respect_query_parameters: flag(row, "respect_query_parameters")?,
        },
        created_at: parse_timestamp(
            "createdon",
            row.try_get("createdon").map_err(map_sqlx_error)?,
        )?,
        updated_at: parse_timestamp(
            "updatedon",
            row.try_get("updatedon").map_err(map_sqlx_error)?,
        )?,
        creation_type,
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_source(&self, host: &str, path: &str) -> Result<Option<Redirect>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM sys_redirect
            WHERE (source_host = ? OR source_host = ?)
              AND source_path = ?
              AND deleted = 0
            ORDER BY (source_host = ?) ASC, uid ASC
            LIMIT 1
            "#
        ))
        .bind(WILDCARD_HOST)
        .bind(host)
        .bind(path)
        .bind(WILDCARD_HOST)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let found = row.as_ref().map(redirect_from_row).transpose()?;
        debug!(host, path, found = ?found.as_ref().map(|row| row.id), "looked up redirect");
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<Redirect>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM sys_redirect WHERE deleted = 0 ORDER BY uid ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(redirect_from_row).collect()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, redirect: NewRedirect) -> Result<Redirect> {
        let result = sqlx::query(
            r#"
            INSERT INTO sys_redirect (
                creation_type, createdon, updatedon,
                keep_query_parameters, is_regexp, force_https,
                target_statuscode, disable_hitcount, respect_query_parameters,
                source_host, source_path, target
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(redirect.creation_type)
        .bind(redirect.created_at.as_second())
        .bind(redirect.updated_at.as_second())
        .bind(redirect.flags.keep_query_parameters)
        .bind(redirect.flags.is_regexp)
        .bind(redirect.flags.force_https)
        .bind(redirect.status_code.as_u16())
        .bind(redirect.flags.disable_hitcount)
        .bind(redirect.flags.respect_query_parameters)
        .bind(&redirect.source_host)
        .bind(&redirect.source_path)
        .bind(&redirect.target)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_id();
        info!(id, source_host = %redirect.source_host, source_path = %redirect.source_path, "inserted redirect");
        Ok(redirect.into_redirect(id))
    }

    async fn update(&self, id: RedirectId, update: RedirectUpdate) -> Result<Redirect> {
        sqlx::query(
            r#"
            UPDATE sys_redirect
            SET updatedon = ?,
                keep_query_parameters = ?,
                is_regexp = ?,
                force_https = ?,
                target_statuscode = ?,
                disable_hitcount = ?,
                respect_query_parameters = ?,
                target = ?
            WHERE uid = ?
              AND deleted = 0
            "#,
        )
        .bind(update.updated_at.as_second())
        .bind(update.flags.keep_query_parameters)
        .bind(update.flags.is_regexp)
        .bind(update.flags.force_https)
        .bind(update.status_code.as_u16())
        .bind(update.flags.disable_hitcount)
        .bind(update.flags.respect_query_parameters)
        .bind(&update.target)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // MySQL reports changed rather than matched rows, so an update that
        // writes identical values affects zero rows. Read the row back instead.
        let row = self
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("uid {id}")))?;
        info!(id, redirect_target = %row.target, "updated redirect");
        Ok(row)
    }
}
