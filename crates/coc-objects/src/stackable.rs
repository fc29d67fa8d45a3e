//! Stacking of identical, unmodified objects of one class.
//!
//! A stack keeps a single representative object and a counter. The host
//! object's own mass already counts one item, so the stack contributes
//! `(actual_stack - 1) × representative mass`.
//!
//! Merging never deletes the candidate; the caller discards it after a
//! [`StackOutcome::Merged`]. Splitting never creates objects; the caller
//! spawns `n` fresh ones of the returned class.

use serde::{Deserialize, Serialize};

use crate::reference::{ObjectRef, StackCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOutcome {
    Merged,
    MaxReached,
    CandidateModified,
    TypeMismatch,
    /// The stack was created with stacking disabled.
    NotStackable,
}

impl StackOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::MaxReached => "max_reached",
            Self::CandidateModified => "candidate_modified",
            Self::TypeMismatch => "type_mismatch",
            Self::NotStackable => "not_stackable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stackable {
    class: String,
    can_stack: bool,
    max_stack: u32,
    actual_stack: u32,
    representative: Option<ObjectRef>,
    total_mass: f64,
}

impl Stackable {
    pub fn new(class: &str, can_stack: bool, max_stack: u32) -> Self {
        Self {
            class: class.to_string(),
            can_stack,
            max_stack: max_stack.max(1),
            actual_stack: 1,
            representative: None,
            total_mass: 0.0,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn can_stack(&self) -> bool {
        self.can_stack
    }

    pub fn max_stack(&self) -> u32 {
        self.max_stack
    }

    pub fn actual_stack(&self) -> u32 {
        self.actual_stack
    }

    pub fn representative(&self) -> Option<&ObjectRef> {
        self.representative.as_ref()
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn update_total_mass(&mut self) -> f64 {
        self.total_mass = match &self.representative {
            Some(rep) if self.actual_stack > 1 => (self.actual_stack - 1) as f64 * rep.mass,
            _ => 0.0,
        };
        self.total_mass
    }

    pub fn add_stack<C: StackCandidate + ?Sized>(&mut self, candidate: &C) -> StackOutcome {
        let outcome = if !self.can_stack {
            StackOutcome::NotStackable
        } else if candidate.class() != self.class {
            StackOutcome::TypeMismatch
        } else if !candidate.is_original() {
            StackOutcome::CandidateModified
        } else if self.actual_stack + candidate.stack_count() > self.max_stack {
            StackOutcome::MaxReached
        } else {
            StackOutcome::Merged
        };

        if outcome == StackOutcome::Merged {
            self.representative = Some(ObjectRef {
                mass: candidate.unit_mass(),
                ..ObjectRef::of(candidate)
            });
            self.actual_stack += candidate.stack_count();
            self.update_total_mass();
            log::debug!(
                "{} merged into {} stack ({}/{})",
                candidate.name(),
                self.class,
                self.actual_stack,
                self.max_stack
            );
        } else {
            log::warn!(
                "{} not stacked onto {}: {}",
                candidate.name(),
                self.class,
                outcome.as_str()
            );
        }
        outcome
    }

    /// Take `n` items off the stack. Returns the class to spawn them from,
    /// or `None` when that would leave fewer than one item. Taking zero
    /// items changes nothing and still answers the class.
    pub fn remove_stack(&mut self, n: u32) -> Option<&str> {
        if n >= self.actual_stack {
            return None;
        }
        if n == 0 {
            return Some(&self.class);
        }
        self.actual_stack -= n;
        self.update_total_mass();
        log::debug!("{} split off {} stack", n, self.class);
        Some(&self.class)
    }

    /// Reset to a lone item with no representative.
    pub fn clear_stack(&mut self) {
        self.actual_stack = 1;
        self.representative = None;
        self.total_mass = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{ObjectId, Physical};

    struct Coin {
        id: u64,
        class: &'static str,
        original: bool,
        count: u32,
    }

    impl Physical for Coin {
        fn id(&self) -> ObjectId {
            ObjectId(self.id)
        }
        fn name(&self) -> &str {
            "coin"
        }
        fn mass(&self) -> f64 {
            7.5 * self.count as f64
        }
        fn volume(&self) -> f64 {
            0.1
        }
    }

    impl StackCandidate for Coin {
        fn class(&self) -> &str {
            self.class
        }
        fn is_original(&self) -> bool {
            self.original
        }
        fn stack_count(&self) -> u32 {
            self.count
        }
        fn unit_mass(&self) -> f64 {
            7.5
        }
    }

    fn coin(id: u64) -> Coin {
        Coin {
            id,
            class: "Coin",
            original: true,
            count: 1,
        }
    }

    #[test]
    fn merge_then_split_round_trip() {
        let mut stack = Stackable::new("Coin", true, 10);
        assert_eq!(stack.actual_stack(), 1);
        assert_eq!(stack.total_mass(), 0.0);

        assert_eq!(stack.add_stack(&coin(2)), StackOutcome::Merged);
        assert_eq!(stack.actual_stack(), 2);
        assert_eq!(stack.total_mass(), 7.5);

        assert_eq!(stack.remove_stack(1), Some("Coin"));
        assert_eq!(stack.actual_stack(), 1);
        assert_eq!(stack.total_mass(), 0.0);
    }

    #[test]
    fn mismatched_class_leaves_stack() {
        let mut stack = Stackable::new("Coin", true, 10);
        let token = Coin {
            class: "Token",
            ..coin(2)
        };
        assert_eq!(stack.add_stack(&token), StackOutcome::TypeMismatch);
        assert_eq!(stack.actual_stack(), 1);
    }

    #[test]
    fn modified_candidate_refused() {
        let mut stack = Stackable::new("Coin", true, 10);
        let bent = Coin {
            original: false,
            ..coin(2)
        };
        assert_eq!(stack.add_stack(&bent), StackOutcome::CandidateModified);
        assert_eq!(stack.actual_stack(), 1);
    }

    #[test]
    fn merging_whole_stacks_respects_max() {
        let mut stack = Stackable::new("Coin", true, 5);
        let purse = Coin { count: 3, ..coin(2) };
        assert_eq!(stack.add_stack(&purse), StackOutcome::Merged);
        assert_eq!(stack.actual_stack(), 4);
        assert_eq!(stack.total_mass(), 22.5);
        assert_eq!(stack.representative().unwrap().mass, 7.5);
        assert_eq!(stack.add_stack(&purse), StackOutcome::MaxReached);
        assert_eq!(stack.add_stack(&coin(3)), StackOutcome::Merged);
        assert_eq!(stack.actual_stack(), 5);
    }

    #[test]
    fn cannot_split_below_one() {
        let mut stack = Stackable::new("Coin", true, 5);
        stack.add_stack(&coin(2));
        assert_eq!(stack.remove_stack(2), None);
        assert_eq!(stack.actual_stack(), 2);
    }

    #[test]
    fn splitting_nothing_is_a_no_op() {
        let mut stack = Stackable::new("Coin", true, 5);
        stack.add_stack(&coin(2));
        assert_eq!(stack.remove_stack(0), Some("Coin"));
        assert_eq!(stack.actual_stack(), 2);
        assert_eq!(stack.total_mass(), 7.5);
    }

    #[test]
    fn clear_resets() {
        let mut stack = Stackable::new("Coin", true, 5);
        stack.add_stack(&coin(2));
        stack.clear_stack();
        assert_eq!(stack.actual_stack(), 1);
        assert_eq!(stack.total_mass(), 0.0);
        assert!(stack.representative().is_none());
    }

    #[test]
    fn disabled_stack() {
        let mut stack = Stackable::new("Coin", false, 5);
        assert_eq!(stack.add_stack(&coin(2)), StackOutcome::NotStackable);
        assert_eq!(stack.actual_stack(), 1);
    }
}
