//! Mock identity helpers for integration tests.
//!
//! Services behind the gateway receive `x-companion-user-id` + `x-companion-user-role`
//! headers injected by the gateway. In tests, `MockAuth` produces those headers
//! directly so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use companion_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use companion_domain::user::UserRole;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: u8) -> Self {
        Self { user_id, user_role }
    }

    pub fn member() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Member.as_u8())
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin.as_u8())
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_str(&self.user_role.to_string()).unwrap(),
        );
        map
    }
}
