use course_core::{ProgressLedger, UnitId};
use pretty_assertions::assert_eq;

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn ids(module: &str, lesson: &str) -> (UnitId, UnitId) {
    (UnitId::from(module), UnitId::from(lesson))
}

#[test]
fn marking_a_lesson_makes_it_completed() {
    init_logging();
    let mut ledger = ProgressLedger::new();
    let (module, lesson) = ids("11", "101");

    assert!(!ledger.is_completed("docker-basics", &module, &lesson));
    assert!(ledger.mark_completed("docker-basics", "Docker Basics", &module, &lesson));
    assert!(ledger.is_completed("docker-basics", &module, &lesson));

    let course = &ledger.courses["docker-basics"];
    assert_eq!(course.title, "Docker Basics");
    assert_eq!(course.completed_lessons["11"], vec!["101".to_string()]);
    assert!(course.completed_modules.is_empty());
}

#[test]
fn marking_twice_reports_no_change() {
    init_logging();
    let mut ledger = ProgressLedger::new();
    let (module, lesson) = ids("11", "101");

    assert!(ledger.mark_completed("k8s", "Kubernetes", &module, &lesson));
    let snapshot = ledger.clone();
    assert!(!ledger.mark_completed("k8s", "Kubernetes", &module, &lesson));
    assert_eq!(ledger, snapshot);
}

#[test]
fn completion_is_scoped_to_course_and_module() {
    let mut ledger = ProgressLedger::new();
    let (module, lesson) = ids("1", "7");
    ledger.mark_completed("a", "A", &module, &lesson);

    assert!(!ledger.is_completed("b", &module, &lesson));
    assert!(!ledger.is_completed("a", &UnitId::from("2"), &lesson));
    assert!(!ledger.is_completed("a", &module, &UnitId::from("8")));
}

#[test]
fn first_title_wins_for_a_course() {
    let mut ledger = ProgressLedger::new();
    let (module, lesson) = ids("1", "1");
    ledger.mark_completed("a", "Original", &module, &lesson);
    ledger.mark_completed("a", "Renamed", &module, &UnitId::from("2"));

    assert_eq!(ledger.courses["a"].title, "Original");
    assert_eq!(ledger.completed_lesson_count(), 2);
}

#[test]
fn module_markers_are_added_once() {
    let mut ledger = ProgressLedger::new();
    let module = UnitId::from("5");

    assert!(!ledger.is_module_completed("a", &module));
    assert!(ledger.mark_module_completed("a", "A", &module));
    assert!(!ledger.mark_module_completed("a", "A", &module));
    assert!(ledger.is_module_completed("a", &module));
    assert_eq!(ledger.courses["a"].completed_modules, vec!["5".to_string()]);
}

#[test]
fn serialized_shape_matches_progress_file() {
    let mut ledger = ProgressLedger::new();
    let (module, lesson) = ids("11", "101");
    ledger.mark_completed("docker-basics", "Docker Basics", &module, &lesson);
    ledger.stamp("2024-05-01T10:00:00.000000Z");

    let value = serde_json::to_value(&ledger).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "last_updated": "2024-05-01T10:00:00.000000Z",
            "courses": {
                "docker-basics": {
                    "title": "Docker Basics",
                    "completed_modules": [],
                    "completed_lessons": { "11": ["101"] }
                }
            }
        })
    );
}

#[test]
fn progress_file_from_older_runs_is_readable() {
    let raw = r#"{
        "last_updated": null,
        "courses": {
            "linux": { "title": "Linux", "completed_lessons": { "3": ["30", "31"] } }
        }
    }"#;
    let ledger: ProgressLedger = serde_json::from_str(raw).unwrap();

    assert!(ledger.is_completed("linux", &UnitId::from("3"), &UnitId::from("31")));
    assert!(ledger.courses["linux"].completed_modules.is_empty());
    assert_eq!(ledger.last_updated, None);
}
