use tracks_rs::api::{ChartInput, ChartKind, ChartSnapshot, Gantt, Timeline};
use tracks_rs::error::ChartError;
use tracks_rs::host::FixedContainer;

const GANTT_INPUT: &str = r##"{
    "bindTo": "#gantt",
    "axis": {
        "x": {
            "lowerLimit": "2023-01-01T00:00:00Z",
            "upperLimit": "2023-01-31T00:00:00Z"
        }
    },
    "padding": { "top": 12, "bottom": 8 },
    "throttle": 250,
    "actionLegend": [
        { "key": "deploy", "label": { "display": "Deploy" } },
        { "key": "review", "label": { "display": "Review" } }
    ],
    "pan": { "enabled": true }
}"##;

const TRACKS: &str = r#"[
    {
        "key": "t1",
        "trackLabel": { "display": "Track 1" },
        "tasks": [
            {
                "key": "task-1",
                "startDate": "2023-01-02T00:00:00Z",
                "endDate": "2023-01-09T00:00:00Z",
                "percentage": 40
            }
        ],
        "actions": [
            { "key": "deploy", "values": ["2023-01-05T00:00:00Z"] }
        ]
    },
    { "key": "t2", "trackLabel": { "display": "Track 2" }, "loadAtIndex": 0 }
]"#;

#[test]
fn gantt_is_driven_end_to_end_by_json() {
    let mut gantt = Gantt::from_json_str(GANTT_INPUT, FixedContainer::new(1200.0)).expect("gantt");
    assert!(gantt.config().pan_enabled);
    assert_eq!(gantt.config().padding.top, 12.0);
    assert_eq!(gantt.config().padding.left, 30.0);

    gantt.load_content_json(TRACKS).expect("load tracks");
    let snapshot = gantt.snapshot();
    assert_eq!(snapshot.kind, ChartKind::Gantt);
    assert_eq!(snapshot.keys, ["t2", "t1"]);
    assert_eq!(snapshot.shown_targets, ["deploy", "review"]);

    gantt
        .unload_content_json(r#"[{"key": "t1"}, "t2"]"#)
        .expect("unload tracks");
    assert_eq!(gantt.track_count(), 0);
    assert_eq!(
        gantt.unload_content_json(r#""t1""#).expect_err("gone").code(),
        "INVALID_OBJECT_PROVIDED"
    );
}

#[test]
fn string_limits_that_are_not_timestamps_are_rejected() {
    let input = r##"{
        "bindTo": "#timeline",
        "axis": { "x": { "lowerLimit": "2023-01-01", "upperLimit": "2023-02-01" } }
    }"##;
    assert_eq!(
        Timeline::from_json_str(input, FixedContainer::new(800.0)).expect_err("text limits"),
        ChartError::InvalidAxisTypeValues
    );
}

#[test]
fn missing_bind_to_in_json_is_reported() {
    let input = r#"{ "axis": { "x": { "lowerLimit": "2023-01-01T00:00:00Z" } } }"#;
    assert_eq!(
        ChartInput::from_json_str(input)
            .and_then(|input| Gantt::new(&input, FixedContainer::new(800.0)).map(|_| ()))
            .expect_err("no bindTo"),
        ChartError::NoBindTarget
    );
}

#[test]
fn snapshot_contract_round_trips_through_json() {
    let mut timeline =
        Timeline::from_json_str(GANTT_INPUT, FixedContainer::new(900.0)).expect("timeline");
    timeline
        .load_content_json(r#"{"key": "m1", "values": [{"x": "2023-01-10T00:00:00Z"}]}"#)
        .expect("load");
    let snapshot = timeline.snapshot();
    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    assert_eq!(ChartSnapshot::from_json_compat_str(&json).expect("parse"), snapshot);

    let bare = serde_json::to_string(&snapshot).expect("bare snapshot");
    assert_eq!(ChartSnapshot::from_json_compat_str(&bare).expect("parse bare"), snapshot);
}

#[test]
fn normalized_config_serializes() {
    let gantt = Gantt::from_json_str(GANTT_INPUT, FixedContainer::new(900.0)).expect("gantt");
    let json = serde_json::to_value(gantt.config()).expect("config json");
    assert_eq!(json["bind_to"], "#gantt");
    assert_eq!(json["pan_enabled"], true);
}
