use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use super::*;
use crate::annotation::{VertexColors, MARKED_COLOR};
use crate::error::PainmapError;
use crate::math::Vector3;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn two_region_config() -> SessionConfig {
    SessionConfig::default().with_labels(RegionLabels::new(["Region A", "Region B"]).unwrap())
}

/// Two vertices near the origin, four near (10, 0, 0).
fn two_blobs() -> VertexStore {
    VertexStore::from_positions(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.1, 0.0, 0.0),
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.1, 0.0, 0.0),
        Point3::new(10.0, 0.1, 0.0),
        Point3::new(10.0, 0.0, 0.1),
    ])
    .unwrap()
}

fn grid(side: usize) -> VertexStore {
    let mut coords = Vec::new();
    for i in 0..side {
        for j in 0..side {
            #[allow(clippy::cast_precision_loss)]
            coords.extend([i as f64, j as f64, 0.0]);
        }
    }
    VertexStore::from_flat(&coords).unwrap()
}

fn loaded_session() -> Session {
    let mut session = Session::new(two_region_config()).unwrap();
    session.load(two_blobs()).unwrap();
    session
}

#[test]
fn marks_each_region_and_clears() {
    init_tracing();
    let mut session = loaded_session();

    let regions = session.assignment().unwrap().as_slice().to_vec();
    assert_eq!(regions[0], regions[1]);
    assert!(regions[2..].iter().all(|&r| r == regions[2]));
    assert_ne!(regions[0], regions[2]);
    assert!(session
        .assignment()
        .unwrap()
        .region_sizes()
        .iter()
        .all(|&size| size > 0));

    session.click(Some(Point3::new(0.0, 0.0, 0.0))).unwrap();
    session.click(Some(Point3::new(10.0, 0.1, 0.0))).unwrap();

    assert_eq!(
        session.export().unwrap().to_csv(),
        "Location Number,Description,Marked\n1,Region A,1\n2,Region B,1\n"
    );

    session.clear_all();

    assert_eq!(
        session.export().unwrap().to_csv(),
        "Location Number,Description,Marked\n1,Region A,0\n2,Region B,0\n"
    );
}

#[test]
fn remark_after_clear_acts_like_fresh_mark() {
    let mut session = loaded_session();
    let first = session.mark(3).unwrap().unwrap();
    session.clear_all();
    let again = session.mark(3).unwrap().unwrap();

    assert_eq!(first, again);
    assert!(again.region_newly_marked);
}

#[test]
fn duplicate_mark_is_silent() {
    let mut session = loaded_session();
    assert!(session.mark(4).unwrap().is_some());
    assert!(session.mark(4).unwrap().is_none());
    assert!(session.click(Some(Point3::new(10.0, 0.1, 0.0))).is_none());
    assert_eq!(session.annotations().unwrap().marked_count(), 1);
}

#[test]
fn export_always_lists_every_region() {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    session.load(grid(10)).unwrap();
    session.mark(0).unwrap();

    let report = session.export().unwrap();
    let numbers: Vec<usize> = report.rows().iter().map(|r| r.number).collect();
    assert_eq!(numbers, (1..=36).collect::<Vec<_>>());
    assert_eq!(report.marked_rows().count(), 1);
}

#[test]
fn no_model_is_a_quiet_state() {
    let mut session = Session::new(two_region_config()).unwrap();

    assert!(!session.has_model());
    assert_eq!(session.pick(Some(Point3::origin())), None);
    assert!(session.click(Some(Point3::origin())).is_none());
    assert!(session.region_marks().is_empty());
    assert!(matches!(
        session.mark(0),
        Err(PainmapError::Session(SessionError::NoModel))
    ));
    session.clear_all();

    let report = session.export().unwrap();
    assert_eq!(report.rows().len(), 2);
    assert_eq!(report.marked_rows().count(), 0);
}

#[test]
fn pick_miss_changes_nothing() {
    let mut session = loaded_session();
    assert_eq!(session.pick(None), None);
    assert!(session.click(None).is_none());
    assert_eq!(session.region_marks(), &[false, false]);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SessionConfig::default().with_iterations(0);
    assert!(matches!(
        Session::new(config),
        Err(PainmapError::InvalidConfiguration(
            ConfigurationError::ZeroIterations
        ))
    ));
}

#[test]
fn failed_load_keeps_previous_model() {
    let mut session = loaded_session();
    session.mark(0).unwrap();
    let generation = session.generation();

    let tiny = VertexStore::from_flat(&[1.0, 1.0, 1.0]).unwrap();
    let result = session.load(tiny);

    assert!(matches!(
        result,
        Err(PainmapError::InvalidConfiguration(
            ConfigurationError::RegionCountOutOfRange {
                region_count: 2,
                vertex_count: 1
            }
        ))
    ));
    assert_eq!(session.generation(), generation);
    assert_eq!(session.vertex_count(), 6);
    assert!(session.is_marked(0));
}

#[test]
fn switching_models_resets_everything() {
    let mut session = loaded_session();
    session.mark(0).unwrap();
    session.mark(5).unwrap();
    let first = session.generation().unwrap();

    let second = session.load(grid(4)).unwrap();

    assert!(second > first);
    assert_eq!(session.vertex_count(), 16);
    assert_eq!(session.assignment().unwrap().vertex_count(), 16);
    assert_eq!(session.region_marks(), &[false, false]);
    assert!(!session.is_marked(0));
}

#[test]
fn background_load_installs_on_wait() {
    init_tracing();
    let mut session = Session::new(two_region_config()).unwrap();
    assert_eq!(session.poll_load().unwrap(), LoadStatus::Idle);

    let generation = session.begin_load(two_blobs()).unwrap();
    assert!(session.is_loading());

    assert_eq!(
        session.wait_load().unwrap(),
        LoadStatus::Installed { generation }
    );
    assert!(!session.is_loading());
    assert_eq!(session.generation(), Some(generation));
    assert_eq!(session.wait_load().unwrap(), LoadStatus::Idle);
}

#[test]
fn poll_eventually_installs() {
    let mut session = Session::new(two_region_config()).unwrap();
    let generation = session.begin_load(two_blobs()).unwrap();

    loop {
        match session.poll_load().unwrap() {
            LoadStatus::Pending => std::thread::yield_now(),
            status => {
                assert_eq!(status, LoadStatus::Installed { generation });
                break;
            }
        }
    }
    assert!(session.has_model());
}

#[test]
fn previous_model_serves_picks_while_loading() {
    let mut session = loaded_session();
    session.mark(0).unwrap();

    session.begin_load(grid(5)).unwrap();
    assert_eq!(session.vertex_count(), 6);
    assert!(session.is_marked(0));
    assert_eq!(session.pick(Some(Point3::new(10.1, 0.0, 0.0))), Some(3));

    session.wait_load().unwrap();
    assert_eq!(session.vertex_count(), 25);
    assert!(!session.is_marked(0));
}

#[test]
fn superseded_load_is_discarded() {
    let mut session = Session::new(two_region_config()).unwrap();

    session.begin_load(grid(30)).unwrap();
    let latest = session.begin_load(two_blobs()).unwrap();

    assert_eq!(
        session.wait_load().unwrap(),
        LoadStatus::Installed { generation: latest }
    );
    assert_eq!(session.vertex_count(), 6);
}

#[test]
fn cancelled_load_never_installs() {
    let mut session = Session::new(two_region_config()).unwrap();
    session.begin_load(two_blobs()).unwrap();
    session.cancel_load();

    assert!(!session.is_loading());
    assert_eq!(session.wait_load().unwrap(), LoadStatus::Idle);
    assert!(!session.has_model());
}

#[test]
fn background_load_rejects_small_surface_up_front() {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    let result = session.begin_load(two_blobs());

    assert!(matches!(
        result,
        Err(PainmapError::InvalidConfiguration(
            ConfigurationError::RegionCountOutOfRange { .. }
        ))
    ));
    assert!(!session.is_loading());
}

#[test]
fn drag_marks_only_while_pressed() {
    let mut session = loaded_session();
    let near_origin = Some(Point3::new(0.01, 0.0, 0.0));

    assert!(session.drag(near_origin).is_none());
    assert!(!session.is_marked(0));

    session.press();
    assert!(session.is_painting());
    assert_eq!(session.drag(near_origin).unwrap().vertex, 0);
    assert!(session.drag(Some(Point3::new(10.0, 0.0, 0.0))).is_some());
    session.release();

    assert!(session.drag(Some(Point3::new(0.1, 0.0, 0.0))).is_none());
    assert!(!session.is_marked(1));
    assert_eq!(session.region_marks(), &[true, true]);
}

#[test]
fn ray_pick_then_paint_triangle() {
    let mut session = loaded_session();
    // Triangle 1 spans vertices 3, 4 and 5 around x = 10.
    let ray = Ray::new(Point3::new(10.03, 0.03, 5.0), Vector3::new(0.0, 0.0, -1.0));
    let hit = session.pick_ray(&ray).unwrap();
    assert_eq!(hit.triangle, 1);

    let marks = session.mark_triangle(hit.triangle).unwrap();
    assert_eq!(
        marks.iter().map(|m| m.vertex).collect::<Vec<_>>(),
        vec![3, 4, 5]
    );
    assert!(session.mark_triangle(hit.triangle).unwrap().is_empty());

    assert!(matches!(
        session.mark_triangle(2),
        Err(PainmapError::Annotation(
            AnnotationError::TriangleOutOfRange {
                index: 2,
                triangle_count: 2
            }
        ))
    ));
}

#[test]
fn observers_see_changes_in_order() {
    let mut session = Session::new(two_region_config()).unwrap();
    let colors = Arc::new(Mutex::new(VertexColors::new(0, [0.5, 0.5, 0.5])));
    let (tx, rx) = mpsc::channel();
    session.subscribe(Arc::clone(&colors));
    session.subscribe(tx);

    session.load(two_blobs()).unwrap();
    let mark = session.mark(2).unwrap().unwrap();
    session.mark(2).unwrap();
    assert_eq!(colors.lock().unwrap().color(2), Some(MARKED_COLOR));

    session.clear_all();
    assert_eq!(colors.lock().unwrap().color(2), Some([0.5, 0.5, 0.5]));

    let events: Vec<AnnotationEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            AnnotationEvent::ModelReplaced {
                vertex_count: 6,
                region_count: 2
            },
            AnnotationEvent::VertexMarked(mark),
            AnnotationEvent::Cleared,
        ]
    );
}

#[test]
fn reconfigure_reclusters_active_model() {
    let mut session = loaded_session();
    session.mark(0).unwrap();

    let three = SessionConfig::default().with_labels(RegionLabels::new(["A", "B", "C"]).unwrap());
    session.reconfigure(three).unwrap();

    assert_eq!(session.region_count(), 3);
    assert_eq!(session.assignment().unwrap().region_count(), 3);
    assert_eq!(session.region_marks(), &[false, false, false]);
    assert_eq!(session.export().unwrap().rows().len(), 3);
}

#[test]
fn reconfigure_with_too_many_regions_changes_nothing() {
    let mut session = loaded_session();
    session.mark(0).unwrap();

    let result = session.reconfigure(SessionConfig::default());

    assert!(result.is_err());
    assert_eq!(session.region_count(), 2);
    assert!(session.is_marked(0));
}

#[test]
fn reconfigure_without_model_just_stores_config() {
    let mut session = Session::new(two_region_config()).unwrap();
    session.reconfigure(SessionConfig::default()).unwrap();

    assert_eq!(session.region_count(), 36);
    assert!(!session.has_model());
}

#[test]
fn same_seed_reproduces_assignment_across_sessions() {
    let mut a = Session::new(SessionConfig::default().with_seed(42)).unwrap();
    let mut b = Session::new(SessionConfig::default().with_seed(42)).unwrap();
    a.load(grid(12)).unwrap();
    b.load(grid(12)).unwrap();

    assert_eq!(a.assignment(), b.assignment());
}

#[test]
fn reconfigure_restarts_pending_load_with_new_regions() {
    let mut session = loaded_session();
    let superseded = session.begin_load(grid(5)).unwrap();

    let three = SessionConfig::default().with_labels(RegionLabels::new(["A", "B", "C"]).unwrap());
    session.reconfigure(three).unwrap();

    assert!(session.is_loading());
    assert_eq!(session.vertex_count(), 6);
    assert_eq!(session.assignment().unwrap().region_count(), 3);

    let status = session.wait_load().unwrap();
    let LoadStatus::Installed { generation } = status else {
        panic!("expected an installed model, got {status:?}");
    };
    assert!(generation > superseded);
    assert_eq!(session.generation(), Some(generation));
    assert_eq!(session.vertex_count(), 25);
    assert_eq!(session.assignment().unwrap().region_count(), 3);
    assert_eq!(session.export().unwrap().rows().len(), 3);
}

#[test]
fn reconfigure_too_large_for_pending_surface_keeps_load() {
    let mut session = loaded_session();
    let generation = session.begin_load(grid(2)).unwrap();

    let five = SessionConfig::default()
        .with_labels(RegionLabels::new(["A", "B", "C", "D", "E"]).unwrap());
    assert!(session.reconfigure(five).is_err());

    assert_eq!(session.region_count(), 2);
    assert_eq!(
        session.wait_load().unwrap(),
        LoadStatus::Installed { generation }
    );
    assert_eq!(session.vertex_count(), 4);
}

#[test]
fn failed_sync_load_keeps_pending_load() {
    let mut session = loaded_session();
    let generation = session.begin_load(grid(5)).unwrap();

    let tiny = VertexStore::from_flat(&[1.0, 1.0, 1.0]).unwrap();
    assert!(session.load(tiny).is_err());
    assert!(session.is_loading());

    assert_eq!(
        session.wait_load().unwrap(),
        LoadStatus::Installed { generation }
    );
    assert_eq!(session.vertex_count(), 25);
}

#[test]
fn successful_sync_load_supersedes_pending_load() {
    let mut session = loaded_session();
    session.begin_load(grid(5)).unwrap();

    let generation = session.load(grid(3)).unwrap();

    assert!(!session.is_loading());
    assert_eq!(session.wait_load().unwrap(), LoadStatus::Idle);
    assert_eq!(session.generation(), Some(generation));
    assert_eq!(session.vertex_count(), 9);
}
