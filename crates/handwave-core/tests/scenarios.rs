//! End-to-end runs of scripted hand streams through the full pipeline.

use handwave_core::history::{HistoryBuffer, HistorySample};
use handwave_core::hit_test::{FocusTree, HitTest, HitTestPolicy, Rect};
use handwave_core::keyboard::gesture_for_key_name;
use handwave_core::synthetic::{HandBuilder, Scenario};
use handwave_core::{
    FocusTarget, Gesture, GesturePipeline, GestureRecognizer, HandFrame, HandPose, HandwaveConfig,
    Intent, LandmarkSmoother, Profile, Viewport,
};

const FRAME_MS: f64 = 33.0;

fn run(
    pipeline: &mut GesturePipeline,
    frames: &[HandFrame],
    hit_test: Option<&dyn HitTest>,
) -> Vec<Gesture> {
    frames
        .iter()
        .filter_map(|f| pipeline.process_frame(f, hit_test).gesture())
        .collect()
}

fn count(gestures: &[Gesture], gesture: Gesture) -> usize {
    gestures.iter().filter(|g| **g == gesture).count()
}

fn pipeline() -> GesturePipeline {
    GesturePipeline::new(HandwaveConfig::default(), Viewport::default())
}

/// A card along the bottom of the screen with an untagged label inside it.
/// The pinching fingertip of the synthetic hand projects to about (683, 697).
fn card_tree() -> FocusTree {
    let mut tree = FocusTree::new(Viewport::default(), HitTestPolicy::default());
    let page = tree.add(Rect::new(0.0, 0.0, 1280.0, 720.0), None, None);
    let card = tree.add(
        Rect::new(400.0, 560.0, 500.0, 160.0),
        Some(page),
        Some(FocusTarget::World {
            id: "WORK".to_string(),
        }),
    );
    tree.add(Rect::new(600.0, 680.0, 200.0, 30.0), Some(card), None);
    tree
}

#[test]
fn steadiness_needs_a_full_sample_run() {
    let mut history = HistoryBuffer::new(1000.0);
    for i in 0..4 {
        history.push(HistorySample {
            x: 0.5,
            y: 0.5,
            z: 0.0,
            scale: 0.2,
            time: i as f64 * FRAME_MS,
            pose: HandPose::Open,
        });
    }
    assert!(!history.is_steady(5, 0.05));

    history.push(HistorySample {
        x: 0.5,
        y: 0.5,
        z: 0.0,
        scale: 0.2,
        time: 4.0 * FRAME_MS,
        pose: HandPose::Open,
    });
    assert!(history.is_steady(5, 0.05));
}

#[test]
fn every_scenario_wakes_exactly_once() {
    for scenario in Scenario::ALL {
        let mut p = pipeline();
        let gestures = run(&mut p, &scenario.frames(FRAME_MS), None);
        assert_eq!(count(&gestures, Gesture::Wake), 1, "{}", scenario);
        assert_eq!(gestures.first(), Some(&Gesture::Wake), "{}", scenario);
        assert!(p.actions().is_active());
        assert!(p.recognizer().is_awake());
    }
}

#[test]
fn pinch_scenario_confirms_once() {
    let mut p = pipeline();
    let gestures = run(&mut p, &Scenario::Pinch.frames(FRAME_MS), None);
    assert_eq!(count(&gestures, Gesture::Confirm), 1);
    assert_eq!(p.actions().confirm_id(), 1);
    assert!(!gestures.iter().any(|g| g.is_scroll()));
}

#[test]
fn scroll_scenario_scrolls_left_only() {
    let mut p = pipeline();
    let gestures = run(&mut p, &Scenario::Scroll.frames(FRAME_MS), None);
    assert!(count(&gestures, Gesture::ScrollLeft) > 5);
    assert_eq!(count(&gestures, Gesture::ScrollRight), 0);
    assert_eq!(count(&gestures, Gesture::Confirm), 0);

    let scroll = p.actions().scroll_signal();
    assert_eq!(scroll.id as usize, count(&gestures, Gesture::ScrollLeft));
    assert_eq!(scroll.payload, -1.0);
}

#[test]
fn summon_scenario_fires_once_within_cooldown() {
    let mut p = pipeline();
    let gestures = run(&mut p, &Scenario::Summon.frames(FRAME_MS), None);
    assert_eq!(count(&gestures, Gesture::Summon), 1);
    assert_eq!(count(&gestures, Gesture::Dismiss), 0);
    assert_eq!(p.actions().summon_id(), 1);
}

#[test]
fn dismiss_scenario_fires_once_within_cooldown() {
    let mut p = pipeline();
    let gestures = run(&mut p, &Scenario::Dismiss.frames(FRAME_MS), None);
    assert_eq!(count(&gestures, Gesture::Dismiss), 1);
    assert_eq!(count(&gestures, Gesture::Summon), 0);
    assert_eq!(p.actions().dismiss_id(), 1);
}

#[test]
fn sensitive_profile_still_summons() {
    let mut p = GesturePipeline::new(
        HandwaveConfig::with_profile(Profile::Sensitive),
        Viewport::default(),
    );
    let gestures = run(&mut p, &Scenario::Summon.frames(FRAME_MS), None);
    assert!(count(&gestures, Gesture::Summon) >= 1);
}

#[test]
fn confirm_targets_the_card_under_the_cursor() {
    let tree = card_tree();
    let mut p = pipeline();
    let mut rx = p.actions().subscribe();

    run(&mut p, &Scenario::Pinch.frames(FRAME_MS), Some(&tree));

    let card = FocusTarget::World {
        id: "WORK".to_string(),
    };
    assert_eq!(p.actions().confirm_focus(), Some(&card));

    let mut intents = Vec::new();
    while let Ok(intent) = rx.try_recv() {
        intents.push(intent);
    }
    let activate = intents.iter().position(|i| *i == Intent::Activate);
    let confirm = intents
        .iter()
        .position(|i| matches!(i, Intent::Confirm { id: 1, .. }));
    assert!(activate.is_some());
    assert!(confirm.is_some());
    assert!(activate < confirm);
    assert_eq!(
        intents[confirm.unwrap_or_default()],
        Intent::Confirm {
            id: 1,
            target: Some(card)
        }
    );
}

#[test]
fn confirm_preempts_scroll_on_the_same_frame() {
    let mut r = GestureRecognizer::default();
    let rest = HandBuilder::open().build();
    let mut t = 0.0;
    while !r.is_awake() {
        r.process(Some(&rest), t);
        t += FRAME_MS;
    }

    // Open hand pinching inside the left scroll band
    let edge_pinch = HandBuilder::open().at(0.9).pinch(0.05).build();
    let mut seen = Vec::new();
    for _ in 0..20 {
        let res = r.process(Some(&edge_pinch), t);
        seen.extend(res.and_then(|r| r.gesture));
        t += FRAME_MS;
    }
    assert_eq!(count(&seen, Gesture::Confirm), 1);
    let at = seen.iter().position(|g| *g == Gesture::Confirm).unwrap();
    // Scrolling runs until the pinch completes and resumes once it is latched
    assert!(seen[..at].iter().all(|g| *g == Gesture::ScrollLeft));
    assert!(seen[at + 1..].iter().all(|g| *g == Gesture::ScrollLeft));
}

#[test]
fn lost_hand_starts_fresh() {
    let mut r = GestureRecognizer::default();
    let hand = HandBuilder::open().build();
    for i in 0..10 {
        r.process(Some(&hand), i as f64 * FRAME_MS);
    }
    assert_eq!(r.history().len(), 10);

    assert!(r.process(None, 400.0).is_none());
    assert!(r.history().is_empty());

    r.process(Some(&hand), 433.0);
    assert_eq!(r.history().len(), 1);
    assert!(r.state().presence_start_time.is_none());
}

#[test]
fn smoother_converges_on_a_still_hand() {
    let mut smoother = LandmarkSmoother::default();
    smoother.smooth_hand(&HandBuilder::open().at(0.2).build());
    let target = HandBuilder::open().at(0.7).build();
    let mut out = smoother.smooth_hand(&target);
    for _ in 0..40 {
        out = smoother.smooth_hand(&target);
    }
    for (a, b) in out.points().iter().zip(target.points()) {
        assert!((a.x - b.x).abs() < 1e-3);
        assert!((a.y - b.y).abs() < 1e-3);
    }
}

#[test]
fn keyboard_and_hand_share_the_action_layer() {
    let mut p = pipeline();
    run(&mut p, &Scenario::Wake.frames(FRAME_MS), None);

    let left = gesture_for_key_name("ArrowLeft").unwrap();
    assert_eq!(p.inject(left), Intent::Scroll { id: 1, delta: -1.0 });
    let esc = gesture_for_key_name("Escape").unwrap();
    assert_eq!(p.inject(esc), Intent::Dismiss { id: 1 });
    // WAKE again is a no-op on the already active layer
    p.inject(Gesture::Wake);
    assert!(p.actions().is_active());
}

#[test]
fn reset_requires_a_new_wake() {
    let mut p = pipeline();
    run(&mut p, &Scenario::Wake.frames(FRAME_MS), None);
    p.reset();
    assert!(!p.recognizer().is_awake());
    assert!(!p.actions().is_active());

    let frames = Scenario::Wake.frames(FRAME_MS);
    let offset = 5000.0;
    let shifted: Vec<HandFrame> = frames
        .into_iter()
        .map(|mut f| {
            f.timestamp_ms += offset;
            f
        })
        .collect();
    let gestures = run(&mut p, &shifted, None);
    assert_eq!(gestures, vec![Gesture::Wake]);
}
