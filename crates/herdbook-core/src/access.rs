//! Operators, roles and permission checks
//!
//! Authorization sits in front of the repository: callers authenticate an
//! [`Operator`] and ask it to authorize each [`Operation`] before
//! dispatching. The repository itself knows nothing about roles.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of operator roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full read/write access
    Administrator,
    /// Read-only access
    Viewer,
}

impl Role {
    /// Whether this role may perform `operation`
    pub fn permits(self, operation: Operation) -> bool {
        match self {
            Role::Administrator => true,
            Role::Viewer => !operation.is_write(),
        }
    }

    /// Operations available to this role, in menu order
    pub fn operations(self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.permits(*op))
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrator"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// Repository operations subject to access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Show,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Show,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    /// Whether the operation changes stored records
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Delete
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Show => "show",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// A configured username/password pair and its role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCredential {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl OperatorCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// An authenticated operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub username: String,
    pub role: Role,
}

impl Operator {
    /// Fail with [`AccessError::Forbidden`] unless the role permits `operation`
    pub fn authorize(&self, operation: Operation) -> Result<(), AccessError> {
        if self.role.permits(operation) {
            Ok(())
        } else {
            Err(AccessError::Forbidden {
                username: self.username.clone(),
                role: self.role,
                operation,
            })
        }
    }
}

/// Authentication and authorization failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User '{username}' ({role}) is not allowed to {operation} records")]
    Forbidden {
        username: String,
        role: Role,
        operation: Operation,
    },
}

/// Check a username/password pair against the configured credentials
pub fn authenticate(
    credentials: &[OperatorCredential],
    username: &str,
    password: &str,
) -> Result<Operator, AccessError> {
    credentials
        .iter()
        .find(|c| c.username == username && c.password == password)
        .map(|c| Operator {
            username: c.username.clone(),
            role: c.role,
        })
        .ok_or(AccessError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Vec<OperatorCredential> {
        vec![
            OperatorCredential::new("admin", "admin123", Role::Administrator),
            OperatorCredential::new("viewer", "viewer123", Role::Viewer),
        ]
    }

    #[test]
    fn test_authenticate() {
        let admin = authenticate(&credentials(), "admin", "admin123").unwrap();
        assert_eq!(admin.role, Role::Administrator);

        let viewer = authenticate(&credentials(), "viewer", "viewer123").unwrap();
        assert_eq!(viewer.username, "viewer");
        assert_eq!(viewer.role, Role::Viewer);
    }

    #[test]
    fn test_authenticate_rejects_mismatches() {
        let creds = credentials();
        assert_eq!(
            authenticate(&creds, "admin", "viewer123"),
            Err(AccessError::InvalidCredentials)
        );
        assert_eq!(
            authenticate(&creds, "Admin", "admin123"),
            Err(AccessError::InvalidCredentials)
        );
        assert_eq!(
            authenticate(&[], "admin", "admin123"),
            Err(AccessError::InvalidCredentials)
        );
    }

    #[test]
    fn test_viewer_is_read_only() {
        let viewer = authenticate(&credentials(), "viewer", "viewer123").unwrap();

        assert!(viewer.authorize(Operation::List).is_ok());
        assert!(viewer.authorize(Operation::Show).is_ok());
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            let err = viewer.authorize(op).unwrap_err();
            assert!(matches!(err, AccessError::Forbidden { operation, .. } if operation == op));
        }
        assert_eq!(
            Role::Viewer.operations(),
            vec![Operation::List, Operation::Show]
        );
    }

    #[test]
    fn test_administrator_can_do_everything() {
        let admin = authenticate(&credentials(), "admin", "admin123").unwrap();

        for op in Operation::ALL {
            assert!(admin.authorize(op).is_ok());
        }
        assert_eq!(Role::Administrator.operations().len(), 5);
    }

    #[test]
    fn test_forbidden_message() {
        let err = AccessError::Forbidden {
            username: "viewer".to_string(),
            role: Role::Viewer,
            operation: Operation::Delete,
        };
        assert_eq!(
            err.to_string(),
            "User 'viewer' (viewer) is not allowed to delete records"
        );
    }

    #[test]
    fn test_role_serialization() {
        let cred = OperatorCredential::new("root", "pw", Role::Administrator);
        let text = toml::to_string(&cred).unwrap();
        assert!(text.contains("role = \"administrator\""));

        let parsed: OperatorCredential = toml::from_str(&text).unwrap();
        assert_eq!(parsed, cred);
    }
}
