use std::fmt;

/// A high-level action bound to some key.
///
/// The frame loop consumes actions, never raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    /// Capture or release the cursor.
    ToggleCursor,
    Quit,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::ToggleCursor,
        Action::Quit,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of actions, one bit each.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    /// Set or clear `action` depending on `held`.
    pub fn set(&mut self, action: Action, held: bool) {
        if held {
            self.insert(action);
        } else {
            self.remove(action);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut set = ActionSet::default();
        assert!(set.is_empty());
        set.insert(Action::MoveForward);
        set.insert(Action::Quit);
        assert!(set.contains(Action::MoveForward));
        assert!(set.contains(Action::Quit));
        assert!(!set.contains(Action::StrafeLeft));
        set.remove(Action::MoveForward);
        assert!(!set.contains(Action::MoveForward));
        assert!(!set.is_empty());
    }

    #[test]
    fn set_follows_held_flag() {
        let mut set = ActionSet::EMPTY;
        set.set(Action::StrafeRight, true);
        assert!(set.contains(Action::StrafeRight));
        set.set(Action::StrafeRight, false);
        assert!(set.is_empty());
    }

    #[test]
    fn collects_and_iterates_in_declaration_order() {
        let set: ActionSet = [Action::Quit, Action::MoveBackward].into_iter().collect();
        let actions: Vec<_> = set.iter().collect();
        assert_eq!(actions, vec![Action::MoveBackward, Action::Quit]);
        assert_eq!(format!("{set:?}"), "{MoveBackward, Quit}");
    }
}
