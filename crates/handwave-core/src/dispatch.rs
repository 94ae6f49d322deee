//! Gesture to intent translation
//!
//! | Gesture        | Intent                                  |
//! |----------------|-----------------------------------------|
//! | WAKE           | activate gesture interaction            |
//! | CONFIRM        | confirm the target under the cursor     |
//! | SCROLL_LEFT    | scroll by `-step` (natural mapping)     |
//! | SCROLL_RIGHT   | scroll by `+step` (natural mapping)     |
//! | SUMMON         | open the overlay                        |
//! | DISMISS        | close the overlay / go back             |

use crate::action::{ActionLayer, Intent};
use crate::config::{DispatchConfig, ScrollMapping};
use crate::cursor::ScreenPoint;
use crate::hit_test::HitTest;
use crate::recognizer::Gesture;

#[derive(Debug, Clone, Default)]
pub struct GestureDispatcher {
    config: DispatchConfig,
}

impl GestureDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Signed scroll delta for a scroll gesture
    pub fn scroll_delta(&self, gesture: Gesture) -> Option<f32> {
        let step = self.config.scroll_step;
        let natural = match gesture {
            Gesture::ScrollLeft => -step,
            Gesture::ScrollRight => step,
            _ => return None,
        };
        Some(match self.config.scroll_mapping {
            ScrollMapping::Natural => natural,
            ScrollMapping::Inverted => -natural,
        })
    }

    /// Refresh hover focus from the cursor position
    pub fn sync_focus(
        &self,
        cursor: ScreenPoint,
        hit_test: &dyn HitTest,
        actions: &mut ActionLayer,
    ) -> bool {
        actions.set_focus(hit_test.focus_at(cursor))
    }

    /// Apply one gesture to the action layer.
    ///
    /// With a cursor and a hit tester, CONFIRM re-resolves the target under
    /// the cursor first; without them (keyboard fallback) it confirms the
    /// currently held focus.
    pub fn dispatch(
        &self,
        gesture: Gesture,
        cursor: Option<ScreenPoint>,
        hit_test: Option<&dyn HitTest>,
        actions: &mut ActionLayer,
    ) -> Intent {
        match gesture {
            Gesture::Wake => {
                actions.activate();
                Intent::Activate
            }
            Gesture::Confirm => {
                let id = match (cursor, hit_test) {
                    (Some(point), Some(tester)) => {
                        let target = tester.focus_at(point);
                        actions.set_focus(target.clone());
                        actions.confirm_target(target)
                    }
                    _ => actions.confirm(),
                };
                Intent::Confirm {
                    id,
                    target: actions.confirm_focus().cloned(),
                }
            }
            Gesture::ScrollLeft | Gesture::ScrollRight => {
                let delta = self.scroll_delta(gesture).unwrap_or_default();
                let id = actions.scroll_by(delta);
                Intent::Scroll { id, delta }
            }
            Gesture::Summon => Intent::Summon {
                id: actions.summon(),
            },
            Gesture::Dismiss => Intent::Dismiss {
                id: actions.dismiss(),
            },
        }
    }
}
