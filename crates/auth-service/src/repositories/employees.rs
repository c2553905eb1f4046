//! Employee directory queries.
//!
//! The `employees` table is owned by the HR services; this service only reads
//! it.

use crate::errors::AuthError;
use crate::models::Employee;
use sqlx::MySqlPool;

/// Get employee by user_id.
pub async fn get_by_user_id(pool: &MySqlPool, user_id: i64) -> Result<Option<Employee>, AuthError> {
    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT
            user_id, fullname, role, username, division, `position`
        FROM employees
        WHERE user_id = ?
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AuthError::Database(format!("Failed to fetch employee by user_id: {}", e)))?;

    Ok(employee)
}
