use crate::error::WishrError;

/// What a credential entitles its holder to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The wisher: adds and removes items.
    Owner,
    /// Friends and family: mark items as bought.
    Viewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "viewer" | "family" => Ok(Role::Viewer),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Request-scoped caller context, handed to every core operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub user_label: Option<String>,
}

impl Session {
    pub fn new(role: Role, user_label: Option<String>) -> Self {
        let user_label = user_label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self { role, user_label }
    }

    /// Fails with `Forbidden` unless this session holds `role`.
    pub fn require(&self, role: Role, action: &'static str) -> Result<(), WishrError> {
        if self.role == role {
            Ok(())
        } else {
            tracing::warn!(role = %self.role, action, "forbidden operation");
            Err(WishrError::Forbidden {
                role: self.role,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_matches_role() {
        let owner = Session::new(Role::Owner, None);
        assert!(owner.require(Role::Owner, "add items").is_ok());
        let err = owner.require(Role::Viewer, "mark items bought").unwrap_err();
        assert!(matches!(
            err,
            WishrError::Forbidden {
                role: Role::Owner,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_label_is_unset() {
        assert_eq!(Session::new(Role::Viewer, Some("  ".into())).user_label, None);
        assert_eq!(
            Session::new(Role::Viewer, Some(" Bob ".into())).user_label.as_deref(),
            Some("Bob")
        );
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("family".parse::<Role>().unwrap(), Role::Viewer);
        assert!("admin".parse::<Role>().is_err());
    }
}
