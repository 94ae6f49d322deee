//! Application-level action layer
//!
//! Gestures, keys and clicks all end up here as intents: confirm the focused
//! target, scroll, summon, dismiss. Every trigger carries a monotonically
//! increasing id so a consumer that compares against the last id it saw never
//! applies an event twice and can tell two identical triggers apart.
//!
//! Consumers either poll the counters with a [`TriggerWatch`] or subscribe to
//! the ordered [`Intent`] stream.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the intent stream before slow subscribers start lagging
const INTENT_CHANNEL_CAPACITY: usize = 64;

/// The UI element currently addressed by the cursor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FocusTarget {
    World { id: String },
    Place { id: String },
    Project { id: String },
    Link { url: String },
    Guide,
    GuideClose,
    ToggleGesture,
    Back,
}

impl FocusTarget {
    /// The focus-type tag the host uses to mark elements
    pub fn kind(&self) -> &'static str {
        match self {
            FocusTarget::World { .. } => "world",
            FocusTarget::Place { .. } => "place",
            FocusTarget::Project { .. } => "project",
            FocusTarget::Link { .. } => "link",
            FocusTarget::Guide => "guide",
            FocusTarget::GuideClose => "guide-close",
            FocusTarget::ToggleGesture => "toggle-gesture",
            FocusTarget::Back => "back",
        }
    }

    /// Build a target from a focus-type tag plus its id or url attribute.
    ///
    /// Tags that need an id/url yield `None` when it is missing.
    pub fn from_tag(kind: &str, id: Option<&str>, url: Option<&str>) -> Option<Self> {
        match kind {
            "world" => id.map(|id| FocusTarget::World { id: id.to_string() }),
            "place" => id.map(|id| FocusTarget::Place { id: id.to_string() }),
            "project" => id.map(|id| FocusTarget::Project { id: id.to_string() }),
            "link" => url.map(|url| FocusTarget::Link { url: url.to_string() }),
            "guide" => Some(FocusTarget::Guide),
            "guide-close" => Some(FocusTarget::GuideClose),
            "toggle-gesture" => Some(FocusTarget::ToggleGesture),
            "back" => Some(FocusTarget::Back),
            _ => None,
        }
    }
}

/// An edge-triggered signal: id changes on every fire
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trigger<T> {
    pub id: u64,
    pub payload: T,
}

impl<T> Trigger<T> {
    fn fire(&mut self, payload: T) -> u64 {
        self.id += 1;
        self.payload = payload;
        self.id
    }
}

/// Scroll trigger payload
pub type ScrollSignal = Trigger<f32>;

/// Remembers the last trigger id a consumer acted on
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerWatch {
    last_seen: u64,
}

impl TriggerWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload of `trigger` if it fired since the last call; `None` otherwise.
    pub fn poll<'a, T>(&mut self, trigger: &'a Trigger<T>) -> Option<&'a T> {
        if trigger.id == self.last_seen {
            return None;
        }
        self.last_seen = trigger.id;
        Some(&trigger.payload)
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }
}

/// One entry on the intent stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Gesture interaction mode switched on
    Activate,
    Focus { target: Option<FocusTarget> },
    Confirm { id: u64, target: Option<FocusTarget> },
    Summon { id: u64 },
    Dismiss { id: u64 },
    Scroll { id: u64, delta: f32 },
}

/// Reactive store of focus and edge-triggered intents
#[derive(Debug)]
pub struct ActionLayer {
    focus: Option<FocusTarget>,
    confirm: Trigger<Option<FocusTarget>>,
    summon: Trigger<()>,
    dismiss: Trigger<()>,
    scroll: ScrollSignal,
    active: bool,
    events: broadcast::Sender<Intent>,
}

impl Default for ActionLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLayer {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(INTENT_CHANNEL_CAPACITY);
        Self {
            focus: None,
            confirm: Trigger::default(),
            summon: Trigger::default(),
            dismiss: Trigger::default(),
            scroll: Trigger::default(),
            active: false,
            events,
        }
    }

    /// Receive every intent from now on, in order
    pub fn subscribe(&self) -> broadcast::Receiver<Intent> {
        self.events.subscribe()
    }

    fn emit(&self, intent: Intent) {
        // No subscribers is fine; the counters still record the trigger
        let _ = self.events.send(intent);
    }

    pub fn focus(&self) -> Option<&FocusTarget> {
        self.focus.as_ref()
    }

    /// Replace the hovered target. Returns true if it changed.
    pub fn set_focus(&mut self, target: Option<FocusTarget>) -> bool {
        if self.focus == target {
            return false;
        }
        tracing::debug!("Focus -> {:?}", target);
        self.focus = target.clone();
        self.emit(Intent::Focus { target });
        true
    }

    /// Confirm whatever currently holds focus
    pub fn confirm(&mut self) -> u64 {
        let target = self.focus.clone();
        self.confirm_target(target)
    }

    /// Confirm an explicit target, which may be nothing at all
    pub fn confirm_target(&mut self, target: Option<FocusTarget>) -> u64 {
        let id = self.confirm.fire(target.clone());
        tracing::debug!("Confirm #{} on {:?}", id, target);
        self.emit(Intent::Confirm { id, target });
        id
    }

    pub fn summon(&mut self) -> u64 {
        let id = self.summon.fire(());
        self.emit(Intent::Summon { id });
        id
    }

    pub fn dismiss(&mut self) -> u64 {
        let id = self.dismiss.fire(());
        self.emit(Intent::Dismiss { id });
        id
    }

    pub fn scroll_by(&mut self, delta: f32) -> u64 {
        let id = self.scroll.fire(delta);
        self.emit(Intent::Scroll { id, delta });
        id
    }

    /// Switch gesture interaction on. Only the first call emits.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.emit(Intent::Activate);
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn confirm_signal(&self) -> &Trigger<Option<FocusTarget>> {
        &self.confirm
    }

    pub fn confirm_id(&self) -> u64 {
        self.confirm.id
    }

    pub fn confirm_focus(&self) -> Option<&FocusTarget> {
        self.confirm.payload.as_ref()
    }

    pub fn summon_signal(&self) -> &Trigger<()> {
        &self.summon
    }

    pub fn summon_id(&self) -> u64 {
        self.summon.id
    }

    pub fn dismiss_signal(&self) -> &Trigger<()> {
        &self.dismiss
    }

    pub fn dismiss_id(&self) -> u64 {
        self.dismiss.id
    }

    pub fn scroll_signal(&self) -> &ScrollSignal {
        &self.scroll
    }
}
