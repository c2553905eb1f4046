//! Employee directory collaborator.
//!
//! The employee `user_id` is the Telegram account id, so login assertions and
//! token claims both resolve through the same lookup.

use crate::errors::AuthError;
use crate::models::Employee;
use crate::repositories::employees;
use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::instrument;

/// Read-only lookup of employees by id.
///
/// `Ok(None)` means the employee does not exist (or was removed); `Err` is
/// reserved for directory I/O failures.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup_user_by_id(&self, user_id: i64) -> Result<Option<Employee>, AuthError>;
}

/// Directory backed by the shared MySQL `employees` table.
#[derive(Debug, Clone)]
pub struct SqlUserDirectory {
    pool: MySqlPool,
}

impl SqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqlUserDirectory {
    #[instrument(skip_all)]
    async fn lookup_user_by_id(&self, user_id: i64) -> Result<Option<Employee>, AuthError> {
        employees::get_by_user_id(&self.pool, user_id).await
    }
}

/// Mock user directory module for testing.
///
/// This module provides an in-memory directory for use in tests.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::RwLock;

    /// In-memory directory with switchable failure mode.
    #[derive(Debug, Default)]
    pub struct MockUserDirectory {
        employees: RwLock<HashMap<i64, Employee>>,
        call_count: AtomicUsize,
        return_error: AtomicBool,
    }

    impl MockUserDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a directory pre-populated with `employees`.
        pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
            let directory = Self::new();
            for employee in employees {
                directory.insert(employee);
            }
            directory
        }

        pub fn insert(&self, employee: Employee) {
            if let Ok(mut map) = self.employees.write() {
                map.insert(employee.user_id, employee);
            }
        }

        /// Remove an employee; later lookups return `None`.
        pub fn remove(&self, user_id: i64) -> Option<Employee> {
            self.employees
                .write()
                .ok()
                .and_then(|mut map| map.remove(&user_id))
        }

        /// Make every subsequent lookup fail with a database error.
        pub fn set_failing(&self, failing: bool) {
            self.return_error.store(failing, Ordering::SeqCst);
        }

        /// Get the number of lookups made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn lookup_user_by_id(&self, user_id: i64) -> Result<Option<Employee>, AuthError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if self.return_error.load(Ordering::SeqCst) {
                return Err(AuthError::Database(
                    "Mock user directory error".to_string(),
                ));
            }

            self.employees
                .read()
                .map(|map| map.get(&user_id).cloned())
                .map_err(|_| AuthError::Internal)
        }
    }

}
