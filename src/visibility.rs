/// A raw viewport-intersection event for one element, as reported by the platform's
/// intersection engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    Enter,
    Exit,
}

/// How enter/exit events are paired into `onEnter`/`onExit` firings.
///
/// The asymmetric strategies exist so a dashboard can treat the two directions differently —
/// e.g. always reload on becoming visible but only unload once, the first time the item
/// leaves, which avoids redundant churn for items that flicker in and out rapidly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackStrategy {
    /// Every enter fires, every exit fires; the two sides are unrelated.
    Independent,
    /// Every enter fires and arms a one-shot exit; an exit fires only while armed.
    ActivateOnEnter,
    /// Every exit fires and arms a one-shot enter; an enter fires only while armed.
    ///
    /// This is the default pairing: an element is born visible, so the first interesting
    /// event is an exit.
    #[default]
    ActivateOnExit,
    /// Only enters ever fire.
    EnterOnly,
    /// Only exits ever fire.
    ExitOnly,
}

/// The per-element visibility state machine.
///
/// The tracker is driven, not subscribed: the adapter feeds raw [`Transition`]s through
/// [`InOutTracker::observe`], which returns the transition whose callback must fire now, or
/// `None` when the event is swallowed by the strategy.
///
/// For the one-shot strategies at most one pending callback type is armed at a time, and
/// re-arming while already armed does not queue a second shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InOutTracker {
    strategy: TrackStrategy,
    armed: bool,
}

impl InOutTracker {
    pub fn new(strategy: TrackStrategy) -> Self {
        Self {
            strategy,
            armed: false,
        }
    }

    pub fn strategy(&self) -> TrackStrategy {
        self.strategy
    }

    /// Whether the one-shot counterpart callback is currently armed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Steps the machine with one raw event.
    pub fn observe(&mut self, transition: Transition) -> Option<Transition> {
        use TrackStrategy::*;
        use Transition::*;

        match (self.strategy, transition) {
            (Independent, t) => Some(t),

            (EnterOnly, Enter) => Some(Enter),
            (EnterOnly, Exit) => None,

            (ExitOnly, Exit) => Some(Exit),
            (ExitOnly, Enter) => None,

            (ActivateOnEnter, Enter) => {
                self.armed = true;
                Some(Enter)
            }
            (ActivateOnEnter, Exit) => self.disarm().then_some(Exit),

            (ActivateOnExit, Exit) => {
                self.armed = true;
                Some(Exit)
            }
            (ActivateOnExit, Enter) => self.disarm().then_some(Enter),
        }
    }

    fn disarm(&mut self) -> bool {
        let was = self.armed;
        self.armed = false;
        was
    }
}
