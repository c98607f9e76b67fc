//! Request classification: who is calling and what they may do.
//!
//! The role and borrower identity are asserted by the caller through
//! headers and trusted verbatim. Everything that consumes the result only
//! sees a [`Caller`], so the header scheme can be replaced by a real
//! authenticator implementing [`RequestClassifier`].

use std::str::FromStr;

use axum::http::HeaderMap;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Header carrying the asserted role
pub const ROLE_HEADER: &str = "x-user-role";
/// Header carrying the asserted borrower identity
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(AppError::Validation(
                "Invalid role. Allowed: admin or user".to_string(),
            )),
        }
    }
}

/// A classified request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
    pub borrower_id: Option<i32>,
}

impl Caller {
    /// Admin-only gate
    pub fn require_admin(&self) -> AppResult<()> {
        if self.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Access denied. Admin role required".to_string(),
            ));
        }
        Ok(())
    }

    /// User-only gate; a user request must name its borrower
    pub fn require_borrower(&self) -> AppResult<i32> {
        if self.role != Role::User {
            return Err(AppError::Forbidden(
                "Access denied. User role required".to_string(),
            ));
        }
        self.borrower_id.ok_or_else(|| {
            AppError::Validation("Header x-user-id is required for user role".to_string())
        })
    }
}

/// Turns inbound request metadata into a [`Caller`] or rejects the request
pub trait RequestClassifier: Send + Sync {
    fn classify(&self, headers: &HeaderMap) -> AppResult<Caller>;
}

/// Trusts the `x-user-role` and `x-user-id` headers as sent
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderClassifier;

impl RequestClassifier for HeaderClassifier {
    fn classify(&self, headers: &HeaderMap) -> AppResult<Caller> {
        let role = headers
            .get(ROLE_HEADER)
            .ok_or_else(|| AppError::Validation("Header x-user-role is required".to_string()))?;
        let role = role
            .to_str()
            .map_err(|_| AppError::Validation("Invalid role. Allowed: admin or user".to_string()))?
            .parse::<Role>()?;

        let borrower_id = match headers.get(USER_ID_HEADER) {
            None => None,
            Some(value) => Some(
                value
                    .to_str()
                    .ok()
                    .and_then(|v| v.trim().parse::<i32>().ok())
                    .ok_or_else(|| {
                        AppError::Validation("Header x-user-id must be an integer".to_string())
                    })?,
            ),
        };

        Ok(Caller { role, borrower_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    fn rejection(result: AppResult<Caller>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_role() {
        let result = HeaderClassifier.classify(&headers(&[(USER_ID_HEADER, "4")]));
        assert_eq!(rejection(result), "Header x-user-role is required");
    }

    #[test]
    fn test_unrecognized_role() {
        for role in ["root", "Admin", ""] {
            let result = HeaderClassifier.classify(&headers(&[(ROLE_HEADER, role)]));
            assert_eq!(rejection(result), "Invalid role. Allowed: admin or user");
        }
    }

    #[test]
    fn test_classified() {
        let admin = HeaderClassifier
            .classify(&headers(&[(ROLE_HEADER, "admin")]))
            .unwrap();
        assert_eq!(
            admin,
            Caller {
                role: Role::Admin,
                borrower_id: None
            }
        );

        let user = HeaderClassifier
            .classify(&headers(&[(ROLE_HEADER, "user"), (USER_ID_HEADER, "42")]))
            .unwrap();
        assert_eq!(user.borrower_id, Some(42));

        let result =
            HeaderClassifier.classify(&headers(&[(ROLE_HEADER, "user"), (USER_ID_HEADER, "bob")]));
        assert_eq!(rejection(result), "Header x-user-id must be an integer");
    }

    #[test]
    fn test_admin_gate() {
        let admin = Caller {
            role: Role::Admin,
            borrower_id: None,
        };
        assert!(admin.require_admin().is_ok());
        assert!(matches!(admin.require_borrower(), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_user_gate() {
        let user = Caller {
            role: Role::User,
            borrower_id: Some(3),
        };
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden(_))));
        assert_eq!(user.require_borrower().unwrap(), 3);

        let anonymous = Caller {
            role: Role::User,
            borrower_id: None,
        };
        assert!(matches!(
            anonymous.require_borrower(),
            Err(AppError::Validation(_))
        ));
    }
}
