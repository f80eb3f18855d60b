use airtrace::{
    CompletionPolicy, CursorState, EndPolicy, FrameOutcome, HandObservation, HandObserver,
    Handedness, InkColor, InteractionMode, Keypoint, Point, Session, SessionConfig, TargetRegion,
    KEYPOINT_COUNT,
};

type Metrics = fn(&str, Point, f32) -> Option<TargetRegion>;

/// Glyph box half as wide as it is tall, centred on the requested point.
fn glyph_box(_: &str, center: Point, font_size: f32) -> Option<TargetRegion> {
    let w = font_size * 0.5;
    let h = font_size;
    Some(TargetRegion::new(center.x - w / 2.0, center.y - h / 2.0, w, h))
}

/// Detector coordinates that land on `target` in canvas space.
fn camera_point(session: &Session<Metrics>, target: Point) -> Point {
    let t = session.config().layout.view_transform();
    let mut x = (target.x - t.dest.x) / t.dest.width * t.source_width;
    if t.mirror_x {
        x = t.source_width - x;
    }
    let y = (target.y - t.dest.y) / t.dest.height * t.source_height;
    Point::new(x, y)
}

/// Hand whose thumb and index tips both land on `target` in canvas space.
fn pinch(session: &Session<Metrics>, target: Point, handedness: Handedness) -> HandObservation {
    let p = camera_point(session, target);
    let mut keypoints = vec![Point::default(); KEYPOINT_COUNT];
    keypoints[Keypoint::ThumbTip.index()] = p;
    keypoints[Keypoint::IndexTip.index()] = p;
    HandObservation::new(keypoints, 0.95, handedness)
}

/// Hand with only the index tip on `target`; every other keypoint sits at
/// the detector origin.
fn fingertip(session: &Session<Metrics>, target: Point, handedness: Handedness) -> HandObservation {
    let mut keypoints = vec![Point::default(); KEYPOINT_COUNT];
    keypoints[Keypoint::IndexTip.index()] = camera_point(session, target);
    HandObservation::new(keypoints, 0.95, handedness)
}

/// Drag the brush handle in small steps along a serpentine over `region`,
/// feeding one hand set per frame.  Returns the outcome that ended the sweep.
fn sweep(session: &mut Session<Metrics>, region: TargetRegion, step: f32) -> Option<FrameOutcome> {
    // Walk from the handle to the region's top-left corner first.
    let mut path = Vec::new();
    let start = session.anchor();
    let corner = Point::new(region.x + 1.0, region.y + 1.0);
    let n = (start.distance(corner) / step).ceil() as usize;
    for i in 1..=n {
        let t = i as f32 / n as f32;
        path.push(Point::new(
            start.x + (corner.x - start.x) * t,
            start.y + (corner.y - start.y) * t,
        ));
    }
    let mut y = region.y + 1.0;
    let mut left_to_right = true;
    while y < region.y + region.height {
        let mut xs: Vec<f32> = Vec::new();
        let mut x = region.x + 1.0;
        while x < region.x + region.width {
            xs.push(x);
            x += step;
        }
        if !left_to_right {
            xs.reverse();
        }
        path.extend(xs.into_iter().map(|x| Point::new(x, y)));
        left_to_right = !left_to_right;
        y += step;
    }

    for target in path {
        let hand = pinch(session, target, Handedness::Right);
        session.on_hands(vec![hand]);
        let outcome = session.update();
        if matches!(outcome, FrameOutcome::Advanced(_)) {
            return Some(outcome);
        }
    }
    None
}

fn config() -> SessionConfig {
    let mut config = SessionConfig::default();
    config.apply_sexp("(:curriculum (\"A\" \"B\" \"C\") :brush-radius 12)").unwrap();
    config
}

#[test]
fn test_sweeping_pinch_completes_letter() {
    let mut session = Session::with_seed(config(), glyph_box as Metrics, 99).unwrap();
    assert_eq!(session.update(), FrameOutcome::Traced { drawing: false, appended: false });
    let region = session.region().unwrap();

    let outcome = sweep(&mut session, region, 10.0);
    assert_eq!(outcome, Some(FrameOutcome::Advanced(CursorState::Active(1))));
    assert!(session.trail().is_empty());
    assert_eq!(session.trail().generation(), 1);
    assert_eq!(session.current_symbol(), Some("B"));
}

#[test]
fn test_trail_only_holds_points_inside_region() {
    let mut session = Session::with_seed(config(), glyph_box as Metrics, 5).unwrap();
    session.update();
    let region = session.region().unwrap();

    // Drag from the centre straight out past the right edge.
    let center = session.anchor();
    let mut x = center.x;
    while x < region.x + region.width + 60.0 {
        let hand = pinch(&session, Point::new(x, center.y), Handedness::Left);
        session.on_hands(vec![hand]);
        session.update();
        x += 5.0;
    }
    assert!(!session.trail().is_empty());
    assert!(session.trail().iter().all(|p| region.contains(p.position)));
    assert!(session.anchor().x > region.x + region.width);
}

#[test]
fn test_full_curriculum_halts() {
    let mut config = config();
    config.end_policy = EndPolicy::Halt;
    config.completion.policy = CompletionPolicy::PointCount;
    config.completion.max_points = 5;
    let mut session = Session::with_seed(config, glyph_box as Metrics, 1).unwrap();

    let mut advances = Vec::new();
    for _ in 0..100 {
        let anchor = session.anchor();
        let hand = pinch(&session, anchor, Handedness::Right);
        session.on_hands(vec![hand]);
        match session.update() {
            FrameOutcome::Advanced(state) => advances.push(state),
            FrameOutcome::Finished => break,
            _ => {}
        }
    }
    assert_eq!(
        advances,
        vec![
            CursorState::Active(1),
            CursorState::Active(2),
            CursorState::Finished
        ]
    );
    assert!(session.is_finished());
    assert!(session.trail().is_empty());
}

#[test]
fn test_mirrored_layout_tracks_real_motion() {
    let mut session = Session::with_seed(SessionConfig::default(), glyph_box as Metrics, 2).unwrap();
    assert!(session.mirror_video());
    session.update();
    let a = session.anchor();
    let here = pinch(&session, a, Handedness::Right);
    let hand = pinch(&session, Point::new(a.x + 20.0, a.y), Handedness::Right);
    // Moving right on screen means the raw camera x went down.
    let tip = Keypoint::IndexTip.index();
    assert!(hand.keypoints[tip].x < here.keypoints[tip].x);
    session.on_hands(vec![hand]);
    session.update();
    assert!(session.pointer().active);
    assert!((session.anchor().x - (a.x + 20.0)).abs() < 0.01);
}

#[test]
fn test_fingertip_drag_in_single_point_mode() {
    let mut config = config();
    config.completion.policy = CompletionPolicy::PointCount;
    config.completion.max_points = 10;

    // The thumb is far from the handle, so a pinch session never draws.
    let mut pinch_session = Session::with_seed(config.clone(), glyph_box as Metrics, 4).unwrap();
    let start = pinch_session.anchor();
    let hand = fingertip(&pinch_session, start, Handedness::Left);
    pinch_session.on_hands(vec![hand]);
    assert_eq!(
        pinch_session.update(),
        FrameOutcome::Traced { drawing: false, appended: false }
    );

    config.gesture.mode = InteractionMode::SinglePoint;
    let mut session = Session::with_seed(config, glyph_box as Metrics, 4).unwrap();
    assert_eq!(session.anchor(), start);

    let mut x = start.x;
    let mut outcome = None;
    for _ in 0..40 {
        let hand = fingertip(&session, Point::new(x, start.y), Handedness::Left);
        session.on_hands(vec![hand]);
        match session.update() {
            FrameOutcome::Advanced(state) => {
                outcome = Some(state);
                break;
            }
            FrameOutcome::Traced { drawing, appended } => {
                assert!(drawing);
                assert!(appended);
                assert_eq!(session.trail().last().map(|p| p.color), Some(Some(InkColor::GREEN)));
            }
            other => panic!("unexpected frame outcome {other:?}"),
        }
        assert!((session.anchor().x - x).abs() < 0.01);
        x += 5.0;
    }
    assert_eq!(outcome, Some(CursorState::Active(1)));
    assert!(session.trail().is_empty());
    assert_eq!(session.current_symbol(), Some("B"));
}
