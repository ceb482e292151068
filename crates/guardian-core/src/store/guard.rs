use thiserror::Error;

use super::Command;
use crate::auth::Role;

/// A command was refused because of the caller's role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role '{role}' may not run '{operation}' (requires '{required}')")]
pub struct AccessDenied {
    pub operation: &'static str,
    pub role: Role,
    pub required: Role,
}

/// The single authorization check wrapped around every store command.
pub struct Guard;

impl Guard {
    pub fn authorize(role: Role, command: &Command) -> Result<(), AccessDenied> {
        match command.required_role() {
            None => Ok(()),
            Some(required) if required == role => Ok(()),
            Some(required) => Err(AccessDenied {
                operation: command.name(),
                role,
                required,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::Queue;

    #[test]
    fn test_gated_commands_need_admin() {
        let gated = [
            Command::SetKillSwitch(true),
            Command::SetRateLimit {
                queue: Queue::Vip,
                value: 10,
            },
        ];
        for command in &gated {
            assert!(Guard::authorize(Role::Admin, command).is_ok());
            let denied = Guard::authorize(Role::Auditor, command).unwrap_err();
            assert_eq!(denied.required, Role::Admin);
            assert_eq!(denied.operation, command.name());
        }
    }

    #[test]
    fn test_role_change_is_not_gated() {
        assert!(Guard::authorize(Role::Viewer, &Command::SetRole(Role::Admin)).is_ok());
    }
}
