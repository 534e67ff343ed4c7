use crate::CoreError;
use ebmock_store::{EnvironmentHealth, EnvironmentStatus};

pub fn validate_transition(from: EnvironmentStatus, to: EnvironmentStatus) -> Result<(), CoreError> {
    let valid = matches!(
        (from, to),
        (EnvironmentStatus::Launching, EnvironmentStatus::Launched)
            | (
                EnvironmentStatus::Launching | EnvironmentStatus::Launched,
                EnvironmentStatus::Terminating
            )
            | (EnvironmentStatus::Terminating, EnvironmentStatus::Terminated)
    );

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Health reported alongside a status. Only a launched environment is green.
pub fn health_for(status: EnvironmentStatus) -> EnvironmentHealth {
    match status {
        EnvironmentStatus::Launched => EnvironmentHealth::Green,
        EnvironmentStatus::Launching
        | EnvironmentStatus::Terminating
        | EnvironmentStatus::Terminated => EnvironmentHealth::Grey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use EnvironmentStatus as S;
        assert!(validate_transition(S::Launching, S::Launched).is_ok());
        assert!(validate_transition(S::Launching, S::Terminating).is_ok());
        assert!(validate_transition(S::Launched, S::Terminating).is_ok());
        assert!(validate_transition(S::Terminating, S::Terminated).is_ok());
    }

    #[test]
    fn invalid_transitions() {
        use EnvironmentStatus as S;
        assert!(validate_transition(S::Terminating, S::Launched).is_err());
        assert!(validate_transition(S::Terminated, S::Launched).is_err());
        assert!(validate_transition(S::Terminating, S::Terminating).is_err());
        assert!(validate_transition(S::Terminated, S::Terminating).is_err());
        assert!(validate_transition(S::Launched, S::Launching).is_err());
        assert!(validate_transition(S::Launching, S::Terminated).is_err());
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err =
            validate_transition(EnvironmentStatus::Terminated, EnvironmentStatus::Terminating)
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid state transition: Terminated -> Terminating"
        );
    }

    #[test]
    fn only_launched_is_green() {
        assert_eq!(health_for(EnvironmentStatus::Launched), EnvironmentHealth::Green);
        assert_eq!(health_for(EnvironmentStatus::Launching), EnvironmentHealth::Grey);
        assert_eq!(health_for(EnvironmentStatus::Terminating), EnvironmentHealth::Grey);
        assert_eq!(health_for(EnvironmentStatus::Terminated), EnvironmentHealth::Grey);
    }
}
