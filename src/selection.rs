//! Two-step selections for attack and fortify commands.
//!
//! An attack selection remembers its source across battles so the same
//! territory can attack repeatedly. A fortify selection ends in `Moved`,
//! which doubles as the once-per-turn marker.

/// Pending attack selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackSelection {
    #[default]
    Idle,
    SourceChosen(usize),
}

impl AttackSelection {
    /// Returns the selected source territory, if any.
    pub fn source(self) -> Option<usize> {
        match self {
            AttackSelection::Idle => None,
            AttackSelection::SourceChosen(from) => Some(from),
        }
    }
}

/// Pending fortify selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FortifySelection {
    #[default]
    Idle,
    SourceChosen(usize),
    /// This turn's fortify move has been made.
    Moved { from: usize, to: usize },
}

impl FortifySelection {
    /// Returns the selected source while a move is still pending.
    pub fn source(self) -> Option<usize> {
        match self {
            FortifySelection::SourceChosen(from) => Some(from),
            FortifySelection::Idle | FortifySelection::Moved { .. } => None,
        }
    }

    /// Returns true once the turn's fortify move is spent.
    pub fn is_done(self) -> bool {
        matches!(self, FortifySelection::Moved { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_idle() {
        assert_eq!(AttackSelection::default(), AttackSelection::Idle);
        assert_eq!(FortifySelection::default(), FortifySelection::Idle);
    }

    #[test]
    fn attack_source() {
        assert_eq!(AttackSelection::Idle.source(), None);
        assert_eq!(AttackSelection::SourceChosen(4).source(), Some(4));
    }

    #[test]
    fn fortify_states() {
        assert_eq!(FortifySelection::SourceChosen(2).source(), Some(2));
        assert!(!FortifySelection::SourceChosen(2).is_done());
        let moved = FortifySelection::Moved { from: 2, to: 3 };
        assert_eq!(moved.source(), None);
        assert!(moved.is_done());
    }
}
