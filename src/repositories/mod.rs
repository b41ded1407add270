pub mod category_repository;
pub mod post_repository;
pub mod topic_repository;
pub mod user_repository;

use sqlx::{Sqlite, Transaction};

use crate::errors::ApiError;

/// Runs an EXISTS query for a foreign-key target inside the write
/// transaction, failing the operation with the given message when the id
/// does not resolve.
pub(crate) async fn check_exists(
    tx: &mut Transaction<'_, Sqlite>,
    sql: &str,
    id: i64,
    missing: String,
) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar(sql).bind(id).fetch_one(&mut **tx).await?;
    if exists {
        Ok(())
    } else {
        Err(ApiError::unprocessable(missing))
    }
}
