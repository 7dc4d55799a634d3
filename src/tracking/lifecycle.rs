//! User lifecycle state machine — presence/visibility/loss flags into
//! discrete user events, at most one per distinct raw-signal change.

use tracing::debug;

use crate::events::Event;
use crate::feed::SubjectData;

use super::{SubjectOutOfRange, SubjectTable};

// ── User states ────────────────────────────────────────────

/// Lifecycle state of one tracked subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserState {
    /// Never observed; dispatches nothing.
    #[default]
    Unseen,
    New,
    Visible,
    OutOfScene,
    Lost,
}

impl UserState {
    /// The event dispatched when this state is newly entered.
    fn event(&self) -> Option<Event> {
        match self {
            Self::Unseen => None,
            Self::New => Some(Event::NewUser),
            Self::Visible => Some(Event::UserVisible),
            Self::OutOfScene => Some(Event::UserOutOfScene),
            Self::Lost => Some(Event::UserLost),
        }
    }
}

// ── Tracker ────────────────────────────────────────────────

#[derive(Default)]
struct Slot {
    state: UserState,
    was_visible: bool,
    last_dispatched: Option<UserState>,
}

/// Per-subject lifecycle tracker.
pub struct UserLifecycleTracker {
    subjects: SubjectTable<Slot>,
}

impl UserLifecycleTracker {
    pub fn new(max_subjects: usize) -> Self {
        Self {
            subjects: SubjectTable::new(max_subjects),
        }
    }

    /// Advance one subject by one frame.  Returns the event to dispatch, if
    /// the computed state differs from the last dispatched one.
    ///
    /// Transition priority is fixed, first match wins: new, became visible,
    /// left the scene, lost.  No match leaves the state unchanged.  The
    /// stored visibility flag is updated unconditionally afterwards, even on
    /// frames with no state change.
    pub fn update(&mut self, subject: &SubjectData) -> Result<Option<Event>, SubjectOutOfRange> {
        let slot = self.subjects.get_mut(subject.id)?;

        if subject.is_new {
            slot.state = UserState::New;
        } else if subject.is_visible && !slot.was_visible {
            slot.state = UserState::Visible;
        } else if !subject.is_visible && slot.was_visible {
            slot.state = UserState::OutOfScene;
        } else if subject.is_lost {
            slot.state = UserState::Lost;
        }

        let mut event = None;
        if slot.state != UserState::Unseen && slot.last_dispatched != Some(slot.state) {
            slot.last_dispatched = Some(slot.state);
            event = slot.state.event();
            debug!(subject = subject.id, state = ?slot.state, "user lifecycle transition");
        }

        slot.was_visible = subject.is_visible;
        Ok(event)
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn subject(id: u32, is_new: bool, is_visible: bool, is_lost: bool) -> SubjectData {
    SubjectData {
        is_new,
        is_visible,
        is_lost,
        ..SubjectData::new(id)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_dispatches_once() {
        let mut tracker = UserLifecycleTracker::new(1);

        let ev = tracker.update(&subject(0, true, true, false)).unwrap();
        assert_eq!(ev, Some(Event::NewUser));

        // Repeating the same raw condition must not re-dispatch.
        for _ in 0..5 {
            let ev = tracker.update(&subject(0, true, true, false)).unwrap();
            assert_eq!(ev, None);
        }
    }

    #[test]
    fn test_visibility_transitions() {
        let mut tracker = UserLifecycleTracker::new(1);

        let ev = tracker.update(&subject(0, false, true, false)).unwrap();
        assert_eq!(ev, Some(Event::UserVisible));

        // Still visible: no event.
        assert_eq!(tracker.update(&subject(0, false, true, false)).unwrap(), None);

        let ev = tracker.update(&subject(0, false, false, false)).unwrap();
        assert_eq!(ev, Some(Event::UserOutOfScene));

        // Re-entrant cycle dispatches again.
        let ev = tracker.update(&subject(0, false, true, false)).unwrap();
        assert_eq!(ev, Some(Event::UserVisible));
    }

    #[test]
    fn test_new_takes_priority_over_visibility() {
        let mut tracker = UserLifecycleTracker::new(1);
        let ev = tracker.update(&subject(0, true, true, false)).unwrap();
        assert_eq!(ev, Some(Event::NewUser));
    }

    #[test]
    fn test_lost_only_without_visibility_change() {
        let mut tracker = UserLifecycleTracker::new(1);
        tracker.update(&subject(0, false, true, false)).unwrap();

        // Visible -> not visible wins over the loss flag this frame.
        let ev = tracker.update(&subject(0, false, false, true)).unwrap();
        assert_eq!(ev, Some(Event::UserOutOfScene));

        // With visibility now settled, the loss flag matches.
        let ev = tracker.update(&subject(0, false, false, true)).unwrap();
        assert_eq!(ev, Some(Event::UserLost));
    }

    #[test]
    fn test_no_signal_no_event() {
        let mut tracker = UserLifecycleTracker::new(1);
        for _ in 0..3 {
            let ev = tracker.update(&subject(0, false, false, false)).unwrap();
            assert_eq!(ev, None);
        }
    }

    #[test]
    fn test_out_of_range_subject_is_fatal() {
        let mut tracker = UserLifecycleTracker::new(1);
        let err = tracker.update(&subject(3, true, true, false)).unwrap_err();
        assert_eq!(err.id, 3);
        assert_eq!(err.max, 1);
    }
}
