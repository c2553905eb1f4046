//! Fixed test IDs and employees for deterministic tests
//!
//! Telegram account IDs double as employee `user_id` values.

use auth_service::models::Employee;
use auth_service::services::user_directory::mock::MockUserDirectory;
use std::sync::Arc;

// Roles
pub const ROLE_SPECIALIST: i32 = 1;
pub const ROLE_HEAD: i32 = 2;
pub const ROLE_OPERATOR: i32 = 3;

// Telegram account IDs
pub const TEST_TELEGRAM_ID_OPERATOR: i64 = 111;
pub const TEST_TELEGRAM_ID_SPECIALIST: i64 = 222;
pub const TEST_TELEGRAM_ID_UNKNOWN: i64 = 999;

/// Build an employee record with the given ID and role.
pub fn test_employee(user_id: i64, role: i32) -> Employee {
    Employee {
        user_id,
        fullname: format!("Test Employee {user_id}"),
        role,
        username: Some(format!("employee{user_id}")),
        division: Some("Test Division".to_string()),
        position: Some("Tester".to_string()),
    }
}

/// In-memory directory holding the operator and the specialist.
pub fn test_directory() -> Arc<MockUserDirectory> {
    Arc::new(MockUserDirectory::with_employees([
        test_employee(TEST_TELEGRAM_ID_OPERATOR, ROLE_OPERATOR),
        test_employee(TEST_TELEGRAM_ID_SPECIALIST, ROLE_SPECIALIST),
    ]))
}
