//! SessionPhase - lifecycle of one operator session.

use serde::{Deserialize, Serialize};

use super::StateMachine;

/// Where an operator session stands.
///
/// `NoOrganization → Researching → Active`. Selecting another organization
/// is allowed from any phase; an organization with stored journeys moves
/// straight to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No organization bound to the session yet.
    NoOrganization,
    /// Organization bound, no journey active.
    Researching,
    /// A journey is active.
    Active,
}

impl SessionPhase {
    /// Returns true when an organization is bound.
    pub fn has_organization(&self) -> bool {
        !matches!(self, SessionPhase::NoOrganization)
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (NoOrganization, Researching)
                | (NoOrganization, Active)
                | (Researching, Researching)
                | (Researching, Active)
                | (Active, Researching)
                | (Active, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            NoOrganization => vec![Researching, Active],
            Researching => vec![Researching, Active],
            Active => vec![Researching, Active],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SessionPhase; 3] = [
        SessionPhase::NoOrganization,
        SessionPhase::Researching,
        SessionPhase::Active,
    ];

    #[test]
    fn no_organization_can_move_to_researching() {
        let next = SessionPhase::NoOrganization.transition_to(SessionPhase::Researching);
        assert_eq!(next, Ok(SessionPhase::Researching));
    }

    #[test]
    fn nothing_returns_to_no_organization() {
        for phase in ALL {
            assert!(phase.transition_to(SessionPhase::NoOrganization).is_err());
        }
    }

    #[test]
    fn active_allows_switching_journeys() {
        assert!(SessionPhase::Active.can_transition_to(&SessionPhase::Active));
    }

    #[test]
    fn no_phase_is_terminal() {
        for phase in ALL {
            assert!(!phase.is_terminal());
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn has_organization_only_after_selection() {
        assert!(!SessionPhase::NoOrganization.has_organization());
        assert!(SessionPhase::Researching.has_organization());
        assert!(SessionPhase::Active.has_organization());
    }
}
