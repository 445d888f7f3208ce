//! The card stack: which pet is on screen, which were already decided, and the
//! Displaying -> Exiting -> Displaying/Exhausted state machine.

use std::collections::HashSet;

use log::{debug, warn};
use thiserror::Error;

use crate::model::Candidate;
use crate::swipe::{interpret, SwipeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Liked,
    Disliked,
}

impl Verdict {
    pub fn exit_direction(self) -> ExitDirection {
        match self {
            Verdict::Liked => ExitDirection::Right,
            Verdict::Disliked => ExitDirection::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDirection {
    Left,
    Right,
}

impl ExitDirection {
    pub fn css_class(self) -> &'static str {
        match self {
            ExitDirection::Left => "animate-swipe-left",
            ExitDirection::Right => "animate-swipe-right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackState {
    Displaying(String),
    Exiting { id: String, direction: ExitDirection },
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("no candidate is on screen")]
    NothingDisplayed,
    #[error("candidate '{got}' is not the one on screen ('{expected}')")]
    NotCurrent { expected: String, got: String },
    #[error("candidate '{id}' is still leaving the stack")]
    ExitInProgress { id: String },
}

#[derive(Debug, Clone)]
pub struct CardStack {
    queue: Vec<Candidate>,
    consumed: HashSet<String>,
    notified: HashSet<String>,
    state: StackState,
    image_index: usize,
}

impl CardStack {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let mut seen = HashSet::new();
        let mut queue = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if seen.insert(candidate.id.clone()) {
                queue.push(candidate);
            } else {
                warn!("Dropping duplicate candidate '{}'", candidate.id);
            }
        }

        let mut stack = Self {
            queue,
            consumed: HashSet::new(),
            notified: HashSet::new(),
            state: StackState::Exhausted,
            image_index: 0,
        };
        stack.advance();
        stack
    }

    pub fn state(&self) -> &StackState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == StackState::Exhausted
    }

    pub fn is_consumed(&self, id: &str) -> bool {
        self.consumed.contains(id)
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.consumed.len()
    }

    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.queue.iter().find(|candidate| candidate.id == id)
    }

    /// The card on screen, including one that is animating out.
    pub fn displayed(&self) -> Option<&Candidate> {
        match &self.state {
            StackState::Displaying(id) | StackState::Exiting { id, .. } => self.find(id),
            StackState::Exhausted => None,
        }
    }

    pub fn exit_direction(&self) -> Option<ExitDirection> {
        match &self.state {
            StackState::Exiting { direction, .. } => Some(*direction),
            _ => None,
        }
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// Commits a like or dislike for the displayed card. The id is consumed
    /// immediately; the stack stays on it until [`CardStack::finish_exit`].
    pub fn decide(&mut self, id: &str, verdict: Verdict) -> Result<ExitDirection, DecisionError> {
        let current = match &self.state {
            StackState::Displaying(current) => current,
            StackState::Exiting { id: exiting, .. } => {
                return Err(DecisionError::ExitInProgress {
                    id: exiting.clone(),
                })
            }
            StackState::Exhausted => return Err(DecisionError::NothingDisplayed),
        };

        if current != id {
            return Err(DecisionError::NotCurrent {
                expected: current.clone(),
                got: id.to_string(),
            });
        }

        let direction = verdict.exit_direction();
        self.consumed.insert(id.to_string());
        self.state = StackState::Exiting {
            id: id.to_string(),
            direction,
        };
        debug!("Candidate '{}' decided: {:?}", id, verdict);
        Ok(direction)
    }

    /// Ends the exit animation for `id` and moves on. Returns the id to report
    /// as consumed, at most once per id for the lifetime of the stack.
    pub fn finish_exit(&mut self, id: &str) -> Option<String> {
        match &self.state {
            StackState::Exiting { id: exiting, .. } if exiting == id => {}
            _ => return None,
        }

        self.advance();
        if self.notified.insert(id.to_string()) {
            Some(id.to_string())
        } else {
            None
        }
    }

    /// Applies a released drag to the displayed card. Only a resting card
    /// reacts; an exiting card ignores gestures.
    pub fn swipe(&mut self, dx: f64, dy: f64) -> SwipeOutcome {
        let StackState::Displaying(id) = &self.state else {
            return SwipeOutcome::Ignored;
        };
        let image_count = self.find(id).map(|c| c.images.len()).unwrap_or(0);

        let outcome = interpret(dx, dy, self.image_index, image_count);
        if let SwipeOutcome::PageTo(index) = outcome {
            self.image_index = index;
        }
        outcome
    }

    /// Puts every candidate back on the stack. Ids already reported as
    /// consumed stay reported.
    pub fn restart(&mut self) {
        self.consumed.clear();
        self.advance();
    }

    fn advance(&mut self) {
        self.image_index = 0;
        self.state = match self
            .queue
            .iter()
            .find(|candidate| !self.consumed.contains(&candidate.id))
        {
            Some(next) => StackState::Displaying(next.id.clone()),
            None => StackState::Exhausted,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, Owner};

    fn pet(id: &str, images: usize) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Pet {id}"),
            images: (0..images).map(|i| format!("{id}-{i}.jpg")).collect(),
            gender: Some(Gender::Male),
            distance_km: 1.0,
            breed: "Mixed".to_string(),
            bio: String::new(),
            owner: Owner {
                name: "Owner".to_string(),
                gender: Some(Gender::Female),
            },
            likes_count: 0,
        }
    }

    fn stack_of(ids: &[&str]) -> CardStack {
        CardStack::new(ids.iter().map(|id| pet(id, 3)).collect())
    }

    #[test]
    fn starts_on_first_candidate() {
        let stack = stack_of(&["a", "b"]);
        assert_eq!(stack.state(), &StackState::Displaying("a".to_string()));
        assert_eq!(stack.displayed().map(|c| c.id.as_str()), Some("a"));
    }

    #[test]
    fn empty_queue_is_exhausted() {
        let mut stack = CardStack::new(Vec::new());
        assert!(stack.is_exhausted());
        assert_eq!(
            stack.decide("a", Verdict::Liked),
            Err(DecisionError::NothingDisplayed)
        );
    }

    #[test]
    fn duplicates_are_dropped() {
        let stack = CardStack::new(vec![pet("a", 1), pet("b", 1), pet("a", 2)]);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn every_candidate_decided_exhausts_the_stack() {
        for n in 0..6 {
            let ids: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            let mut stack = CardStack::new(ids.iter().map(|id| pet(id, 1)).collect());
            for (i, id) in ids.iter().enumerate() {
                let verdict = if i % 2 == 0 {
                    Verdict::Liked
                } else {
                    Verdict::Disliked
                };
                stack.decide(id, verdict).unwrap();
                assert_eq!(stack.finish_exit(id), Some(id.clone()));
            }
            assert_eq!(stack.consumed_count(), n);
            assert!(stack.is_exhausted());
        }
    }

    #[test]
    fn like_exits_right_and_dislike_exits_left() {
        let mut stack = stack_of(&["a", "b"]);
        assert_eq!(stack.decide("a", Verdict::Liked), Ok(ExitDirection::Right));
        stack.finish_exit("a");
        assert_eq!(stack.decide("b", Verdict::Disliked), Ok(ExitDirection::Left));
        assert_eq!(stack.exit_direction(), Some(ExitDirection::Left));
    }

    #[test]
    fn decision_for_other_candidate_changes_nothing() {
        let mut stack = stack_of(&["a", "b", "c"]);
        let before = stack.state().clone();

        let err = stack.decide("b", Verdict::Liked).unwrap_err();
        assert_eq!(
            err,
            DecisionError::NotCurrent {
                expected: "a".to_string(),
                got: "b".to_string()
            }
        );
        assert_eq!(stack.state(), &before);
        assert_eq!(stack.consumed_count(), 0);
        assert_eq!(stack.remaining(), 3);
    }

    #[test]
    fn second_decision_while_exiting_is_rejected() {
        let mut stack = stack_of(&["a", "b"]);
        stack.decide("a", Verdict::Liked).unwrap();

        assert_eq!(
            stack.decide("a", Verdict::Disliked),
            Err(DecisionError::ExitInProgress { id: "a".to_string() })
        );
        assert_eq!(
            stack.decide("b", Verdict::Liked),
            Err(DecisionError::ExitInProgress { id: "a".to_string() })
        );
        assert_eq!(stack.consumed_count(), 1);
        assert_eq!(
            stack.state(),
            &StackState::Exiting {
                id: "a".to_string(),
                direction: ExitDirection::Right
            }
        );
    }

    #[test]
    fn finish_exit_only_applies_to_exiting_candidate() {
        let mut stack = stack_of(&["a", "b"]);
        assert_eq!(stack.finish_exit("a"), None);
        stack.decide("a", Verdict::Liked).unwrap();
        assert_eq!(stack.finish_exit("b"), None);
        assert_eq!(stack.finish_exit("a"), Some("a".to_string()));
        assert_eq!(stack.finish_exit("a"), None);
        assert_eq!(stack.state(), &StackState::Displaying("b".to_string()));
    }

    #[test]
    fn two_dislikes_leave_third_candidate_on_screen() {
        let mut stack = stack_of(&["a", "b", "c"]);
        stack.decide("a", Verdict::Disliked).unwrap();
        stack.finish_exit("a");
        stack.decide("b", Verdict::Disliked).unwrap();
        stack.finish_exit("b");
        assert_eq!(stack.state(), &StackState::Displaying("c".to_string()));
        assert!(!stack.is_exhausted());
    }

    #[test]
    fn paging_moves_within_images_and_resets_on_advance() {
        let mut stack = stack_of(&["a", "b"]);
        assert_eq!(stack.swipe(150.0, 0.0), SwipeOutcome::Ignored);
        assert_eq!(stack.image_index(), 0);

        assert_eq!(stack.swipe(-150.0, 0.0), SwipeOutcome::PageTo(1));
        assert_eq!(stack.swipe(150.0, 0.0), SwipeOutcome::PageTo(0));
        assert_eq!(stack.swipe(-150.0, 0.0), SwipeOutcome::PageTo(1));

        stack.decide("a", Verdict::Liked).unwrap();
        stack.finish_exit("a");
        assert_eq!(stack.image_index(), 0);
    }

    #[test]
    fn gestures_are_ignored_while_exiting() {
        let mut stack = stack_of(&["a", "b"]);
        stack.decide("a", Verdict::Liked).unwrap();
        assert_eq!(stack.swipe(-150.0, 0.0), SwipeOutcome::Ignored);
        assert_eq!(stack.swipe(0.0, -150.0), SwipeOutcome::Ignored);
        assert_eq!(stack.image_index(), 0);
    }

    #[test]
    fn restart_returns_to_first_candidate() {
        let mut stack = stack_of(&["a"]);
        stack.decide("a", Verdict::Liked).unwrap();
        stack.finish_exit("a");
        assert!(stack.is_exhausted());

        stack.restart();
        assert_eq!(stack.consumed_count(), 0);
        assert_eq!(stack.state(), &StackState::Displaying("a".to_string()));
        stack.decide("a", Verdict::Disliked).unwrap();
        assert_eq!(stack.finish_exit("a"), None);
        assert!(stack.is_exhausted());
    }
}
