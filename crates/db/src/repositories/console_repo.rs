//! Query execution for the administrative console.

use rallycontrol_core::types::DbId;
use serde::Serialize;
use sqlx::PgPool;

use crate::console::{build_console_filter, row_object, BindValue, ConsoleQuery, ConsoleSpec};

/// One page of console rows plus the unpaginated match count.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolePage {
    pub total: i64,
    pub rows: Vec<serde_json::Value>,
}

/// Generic read/delete access to any table declared in
/// [`CONSOLE_SPECS`](crate::console::CONSOLE_SPECS).
pub struct ConsoleRepo;

impl ConsoleRepo {
    /// Fetch one page of rows matching `query`, plus the total match count.
    pub async fn search(
        pool: &PgPool,
        spec: &ConsoleSpec,
        query: &ConsoleQuery,
    ) -> Result<ConsolePage, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_console_filter(spec, query);

        let rows_sql = format!(
            "SELECT {} FROM {} {where_clause} ORDER BY {} LIMIT ${bind_idx} OFFSET ${}",
            row_object(spec),
            spec.from,
            spec.order_by,
            bind_idx + 1
        );
        let rows = bind_console_values(
            sqlx::query_scalar::<_, serde_json::Value>(&rows_sql),
            &bind_values,
        )
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(pool)
        .await?;

        let count_sql = format!("SELECT COUNT(*) FROM {} {where_clause}", spec.from);
        let total = bind_console_values(sqlx::query_scalar::<_, i64>(&count_sql), &bind_values)
            .fetch_one(pool)
            .await?;

        Ok(ConsolePage { total, rows })
    }

    /// Fetch every column of one row as JSON. Password hashes are stripped.
    pub async fn find(
        pool: &PgPool,
        spec: &ConsoleSpec,
        id: DbId,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        let query = format!(
            "SELECT to_jsonb(t) - 'password_hash' FROM {} t WHERE t.id = $1",
            spec.table
        );
        sqlx::query_scalar::<_, serde_json::Value>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete one row, applying the schema's cascade and set-null rules.
    pub async fn delete(pool: &PgPool, spec: &ConsoleSpec, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, spec.table, id).await
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_console_values<'q, O>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}
