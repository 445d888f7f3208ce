//! Wires the gesture tracker, the card stack and the exit timer together and
//! reports what happened to a [`DeckListener`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{debug, warn};

use crate::deck::{CardStack, DecisionError, ExitDirection, Verdict};
use crate::gesture::{CardPose, GestureTracker, Point};
use crate::model::Candidate;
use crate::schedule::{ScheduledTask, Scheduler};
use crate::swipe::SwipeOutcome;

/// How long a decided card animates out before the next one is revealed.
pub const EXIT_DURATION: Duration = Duration::from_millis(500);

pub trait DeckListener {
    fn on_decision(&self, _id: &str, _verdict: Verdict) {}
    fn on_detail_view(&self, _id: &str) {}
    fn on_consumed(&self, _id: &str) {}
    /// Called after the stack advanced on its own, i.e. when an exit finished.
    fn on_change(&self) {}
}

struct SessionState {
    stack: CardStack,
    tracker: GestureTracker,
    pending_exit: Option<ScheduledTask>,
}

/// Everything the card view needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckView {
    pub displayed: Option<Candidate>,
    pub image_index: usize,
    pub exiting: Option<ExitDirection>,
    pub pose: CardPose,
    pub dragging: bool,
    pub exhausted: bool,
    pub empty: bool,
}

pub struct DeckSession<S> {
    state: Rc<RefCell<SessionState>>,
    listener: Rc<dyn DeckListener>,
    scheduler: S,
}

impl<S: Scheduler> DeckSession<S> {
    pub fn new(candidates: Vec<Candidate>, scheduler: S, listener: Rc<dyn DeckListener>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState {
                stack: CardStack::new(candidates),
                tracker: GestureTracker::new(),
                pending_exit: None,
            })),
            listener,
            scheduler,
        }
    }

    pub fn view(&self) -> DeckView {
        let state = self.state.borrow();
        DeckView {
            displayed: state.stack.displayed().cloned(),
            image_index: state.stack.image_index(),
            exiting: state.stack.exit_direction(),
            pose: state.tracker.pose(),
            dragging: state.tracker.is_active(),
            exhausted: state.stack.is_exhausted(),
            empty: state.stack.is_empty(),
        }
    }

    pub fn inspect<R>(&self, f: impl FnOnce(&CardStack) -> R) -> R {
        f(&self.state.borrow().stack)
    }

    pub fn press(&self, at: Point) {
        self.state.borrow_mut().tracker.press(at);
    }

    pub fn drag(&self, at: Point) {
        self.state.borrow_mut().tracker.move_to(at);
    }

    pub fn cancel_drag(&self) {
        self.state.borrow_mut().tracker.cancel();
    }

    /// Ends the drag and applies it to the displayed card.
    pub fn release(&self) -> SwipeOutcome {
        let (outcome, detail_id) = {
            let mut state = self.state.borrow_mut();
            let Some(session) = state.tracker.release() else {
                return SwipeOutcome::Ignored;
            };
            let outcome = state.stack.swipe(session.dx, session.dy);
            let detail_id = match outcome {
                SwipeOutcome::DetailView => state.stack.displayed().map(|c| c.id.clone()),
                _ => None,
            };
            (outcome, detail_id)
        };

        if let Some(id) = detail_id {
            self.listener.on_detail_view(&id);
        }
        outcome
    }

    pub fn like(&self, id: &str) -> Result<(), DecisionError> {
        self.decide(id, Verdict::Liked)
    }

    pub fn dislike(&self, id: &str) -> Result<(), DecisionError> {
        self.decide(id, Verdict::Disliked)
    }

    fn decide(&self, id: &str, verdict: Verdict) -> Result<(), DecisionError> {
        if let Err(err) = self.state.borrow_mut().stack.decide(id, verdict) {
            warn!("Ignoring {:?} for '{}': {}", verdict, id, err);
            return Err(err);
        }

        let weak = Rc::downgrade(&self.state);
        let listener = self.listener.clone();
        let exiting = id.to_string();
        let handle = self.scheduler.schedule(
            EXIT_DURATION,
            Box::new(move || complete_exit(&weak, listener.as_ref(), &exiting)),
        );
        self.state.borrow_mut().pending_exit = Some(handle);

        self.listener.on_decision(id, verdict);
        Ok(())
    }

    /// Clears the consumed set and starts over from the first candidate.
    pub fn restart(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(pending) = state.pending_exit.take() {
            pending.cancel();
        }
        state.tracker.cancel();
        state.stack.restart();
        debug!("Deck restarted with {} candidates", state.stack.len());
    }

    /// Drops a pending exit without reporting it, e.g. when the view unmounts.
    pub fn detach(&self) {
        if let Some(pending) = self.state.borrow_mut().pending_exit.take() {
            pending.cancel();
        }
    }
}

fn complete_exit(state: &Weak<RefCell<SessionState>>, listener: &dyn DeckListener, id: &str) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let consumed = {
        let mut state = state.borrow_mut();
        state.pending_exit = None;
        state.stack.finish_exit(id)
    };

    if let Some(id) = consumed {
        debug!("Candidate '{}' left the deck", id);
        listener.on_consumed(&id);
    }
    listener.on_change();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::StackState;
    use crate::model::{Gender, Owner};
    use crate::schedule::VirtualClock;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Decision(String, Verdict),
        Detail(String),
        Consumed(String),
    }

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<Event>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
            self.events.borrow().iter().filter(|e| matches(e)).count()
        }
    }

    impl DeckListener for Recorder {
        fn on_decision(&self, id: &str, verdict: Verdict) {
            self.events
                .borrow_mut()
                .push(Event::Decision(id.to_string(), verdict));
        }

        fn on_detail_view(&self, id: &str) {
            self.events.borrow_mut().push(Event::Detail(id.to_string()));
        }

        fn on_consumed(&self, id: &str) {
            self.events.borrow_mut().push(Event::Consumed(id.to_string()));
        }
    }

    fn pet(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: id.to_uppercase(),
            images: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
            gender: Some(Gender::Female),
            distance_km: 3.0,
            breed: "Corgi".to_string(),
            bio: String::new(),
            owner: Owner {
                name: "Kim".to_string(),
                gender: Some(Gender::Male),
            },
            likes_count: 4,
        }
    }

    fn session(ids: &[&str]) -> (DeckSession<VirtualClock>, VirtualClock, Rc<Recorder>) {
        let clock = VirtualClock::new();
        let recorder = Rc::new(Recorder::default());
        let session = DeckSession::new(
            ids.iter().map(|id| pet(id)).collect(),
            clock.clone(),
            recorder.clone(),
        );
        (session, clock, recorder)
    }

    fn swipe(session: &DeckSession<VirtualClock>, dx: f64, dy: f64) -> SwipeOutcome {
        session.press(Point::new(200.0, 300.0));
        session.drag(Point::new(200.0 + dx / 2.0, 300.0 + dy / 2.0));
        session.drag(Point::new(200.0 + dx, 300.0 + dy));
        session.release()
    }

    #[test]
    fn upward_swipe_reports_detail_view_only() {
        let (session, clock, recorder) = session(&["a", "b"]);
        assert_eq!(swipe(&session, 10.0, -150.0), SwipeOutcome::DetailView);
        clock.advance(Duration::from_secs(2));

        assert_eq!(recorder.events(), vec![Event::Detail("a".to_string())]);
        assert_eq!(
            recorder.count(|e| matches!(e, Event::Decision(..))),
            0
        );
        session.inspect(|stack| {
            assert_eq!(stack.state(), &StackState::Displaying("a".to_string()));
        });
    }

    #[test]
    fn horizontal_swipes_page_images() {
        let (session, _clock, recorder) = session(&["a"]);
        assert_eq!(swipe(&session, 150.0, 0.0), SwipeOutcome::Ignored);
        assert_eq!(session.view().image_index, 0);
        assert_eq!(swipe(&session, -150.0, 5.0), SwipeOutcome::PageTo(1));
        assert_eq!(swipe(&session, 150.0, 0.0), SwipeOutcome::PageTo(0));
        assert_eq!(swipe(&session, 90.0, 0.0), SwipeOutcome::Ignored);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn card_follows_pointer_until_release() {
        let (session, _clock, _recorder) = session(&["a"]);
        session.press(Point::new(0.0, 0.0));
        session.drag(Point::new(50.0, 0.0));
        let view = session.view();
        assert!(view.dragging);
        assert_eq!(view.pose.translate_x, 50.0);

        session.cancel_drag();
        assert!(session.view().pose.is_resting());
        assert_eq!(session.release(), SwipeOutcome::Ignored);
    }

    #[test]
    fn exit_completes_after_five_hundred_millis() {
        let (session, clock, recorder) = session(&["a", "b"]);
        session.like("a").unwrap();
        assert_eq!(session.view().exiting, Some(ExitDirection::Right));
        assert_eq!(
            recorder.events(),
            vec![Event::Decision("a".to_string(), Verdict::Liked)]
        );

        clock.advance(Duration::from_millis(499));
        assert_eq!(session.view().displayed.map(|c| c.id), Some("a".to_string()));

        clock.advance(Duration::from_millis(1));
        assert_eq!(session.view().displayed.map(|c| c.id), Some("b".to_string()));
        assert_eq!(session.view().exiting, None);
        assert_eq!(
            recorder.events().last(),
            Some(&Event::Consumed("a".to_string()))
        );
    }

    #[test]
    fn second_decision_during_exit_is_ignored() {
        let (session, clock, recorder) = session(&["a", "b"]);
        session.dislike("a").unwrap();
        assert!(matches!(
            session.like("a"),
            Err(DecisionError::ExitInProgress { .. })
        ));
        assert!(matches!(
            session.dislike("b"),
            Err(DecisionError::ExitInProgress { .. })
        ));
        session.inspect(|stack| assert_eq!(stack.consumed_count(), 1));

        clock.advance(EXIT_DURATION);
        session.inspect(|stack| {
            assert_eq!(stack.consumed_count(), 1);
            assert_eq!(stack.state(), &StackState::Displaying("b".to_string()));
        });
        assert_eq!(recorder.count(|e| matches!(e, Event::Decision(..))), 1);
        assert_eq!(recorder.count(|e| matches!(e, Event::Consumed(..))), 1);
    }

    #[test]
    fn decision_for_wrong_card_has_no_effect() {
        let (session, clock, recorder) = session(&["a", "b"]);
        assert!(session.like("b").is_err());
        clock.advance(Duration::from_secs(1));
        assert!(recorder.events().is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn two_dislikes_reveal_the_third_candidate() {
        let (session, clock, _recorder) = session(&["a", "b", "c"]);
        session.dislike("a").unwrap();
        clock.advance(EXIT_DURATION);
        session.dislike("b").unwrap();
        clock.advance(EXIT_DURATION);

        let view = session.view();
        assert_eq!(view.displayed.map(|c| c.id), Some("c".to_string()));
        assert!(!view.exhausted);
    }

    #[test]
    fn deciding_every_card_exhausts_the_deck() {
        let ids = ["a", "b", "c", "d"];
        let (session, clock, recorder) = session(&ids);
        for id in ids {
            session.like(id).unwrap();
            clock.advance(EXIT_DURATION);
        }

        assert!(session.view().exhausted);
        session.inspect(|stack| assert_eq!(stack.consumed_count(), ids.len()));
        assert_eq!(
            recorder.count(|e| matches!(e, Event::Consumed(..))),
            ids.len()
        );
        assert_eq!(session.like("a"), Err(DecisionError::NothingDisplayed));
    }

    #[test]
    fn detach_suppresses_pending_notification() {
        let (session, clock, recorder) = session(&["a", "b"]);
        session.like("a").unwrap();
        session.detach();
        clock.advance(Duration::from_secs(1));
        assert_eq!(recorder.count(|e| matches!(e, Event::Consumed(..))), 0);
    }

    #[test]
    fn restart_cancels_exit_and_shows_first_card() {
        let (session, clock, recorder) = session(&["a", "b"]);
        session.like("a").unwrap();
        session.restart();
        clock.advance(Duration::from_secs(1));

        assert_eq!(recorder.count(|e| matches!(e, Event::Consumed(..))), 0);
        assert_eq!(session.view().displayed.map(|c| c.id), Some("a".to_string()));
        session.inspect(|stack| assert_eq!(stack.consumed_count(), 0));
    }

    #[test]
    fn consumed_is_reported_once_across_restarts() {
        let (session, clock, recorder) = session(&["a", "b"]);
        session.like("a").unwrap();
        clock.advance(EXIT_DURATION);
        session.restart();
        session.like("a").unwrap();
        clock.advance(EXIT_DURATION);

        assert_eq!(
            recorder.count(|e| matches!(e, Event::Consumed(..))),
            1
        );
        assert_eq!(recorder.count(|e| matches!(e, Event::Decision(..))), 2);
        assert_eq!(session.view().displayed.map(|c| c.id), Some("b".to_string()));
    }

    #[test]
    fn session_dropped_before_timer_is_harmless() {
        let (session, clock, recorder) = session(&["a"]);
        session.like("a").unwrap();
        drop(session);
        clock.advance(Duration::from_secs(1));
        assert_eq!(recorder.count(|e| matches!(e, Event::Consumed(..))), 0);
    }
}
