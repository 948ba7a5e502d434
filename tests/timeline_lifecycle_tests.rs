use chrono::{DateTime, TimeZone, Utc};
use tracks_rs::api::{
    ChartInput, ContentKey, LegendItemInput, TIMELINE_LABEL_CLASS, TIMELINE_POINT_CLASS, Timeline,
    TimelineContent,
};
use tracks_rs::error::ChartError;
use tracks_rs::host::FixedContainer;
use tracks_rs::render::{NodeKind, NullRenderer};

fn month(month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, month, 1, 0, 0, 0).unwrap()
}

fn year_input() -> ChartInput {
    ChartInput::time_series("#timeline", month(1), month(12))
}

#[test]
fn timeline_has_no_band_height() {
    let timeline = Timeline::new(&year_input(), FixedContainer::new(800.0)).expect("timeline");
    let config = timeline.config();
    assert_eq!(config.height, 0.0);
    assert_eq!(
        config.canvas_height,
        2.0 * (config.padding.top + config.padding.bottom)
    );
    assert!(timeline.scales().expect("scales").y.is_none());
}

#[test]
fn points_sit_on_the_axis_baseline() {
    let mut timeline = Timeline::new(&year_input(), FixedContainer::new(800.0)).expect("timeline");
    timeline
        .load_content(TimelineContent::new("launch", vec![month(3), month(9)]).with_label("Launch"))
        .expect("load");

    let points = timeline.scene().find_by_class(TIMELINE_POINT_CLASS);
    assert_eq!(points.len(), 2);
    let scales = timeline.scales().expect("scales");
    let mut xs = Vec::new();
    for point in points {
        let NodeKind::Circle(circle) = timeline.scene().node(point).expect("point").kind else {
            panic!("timeline point must be a circle");
        };
        assert_eq!(circle.cy, timeline.config().padding.top);
        xs.push(circle.cx);
    }
    assert_eq!(xs[0], scales.x.time_to_pixel(month(3)).expect("x"));
    assert!(xs[0] < xs[1]);
}

#[test]
fn load_and_unload_batch() {
    let mut timeline = Timeline::new(&year_input(), FixedContainer::new(800.0)).expect("timeline");
    timeline
        .load_content(vec![
            TimelineContent::new("a", vec![month(2)]),
            TimelineContent::new("b", vec![month(4)]),
            TimelineContent::new("c", vec![month(6)]),
        ])
        .expect("load batch");
    timeline
        .unload_content(vec![ContentKey::from("a"), ContentKey::from("c")])
        .expect("unload batch");

    let keys: Vec<&str> = timeline.keys().map(ContentKey::as_str).collect();
    assert_eq!(keys, ["b"]);
    let shown: Vec<&str> = timeline
        .config()
        .shown_targets
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(shown, ["b"]);
    assert_eq!(timeline.scene().find_by_class(TIMELINE_POINT_CLASS).len(), 1);
}

#[test]
fn duplicate_and_missing_keys_fail() {
    let mut timeline = Timeline::new(&year_input(), FixedContainer::new(800.0)).expect("timeline");
    timeline
        .load_content(TimelineContent::new("a", vec![month(2)]))
        .expect("load");
    assert_eq!(
        timeline
            .load_content(TimelineContent::new("a", vec![month(3)]))
            .expect_err("duplicate"),
        ChartError::DuplicateContentKey {
            key: "a".to_owned()
        }
    );
    assert_eq!(
        timeline.unload_content("zzz").expect_err("missing").code(),
        "INVALID_OBJECT_PROVIDED"
    );
    assert_eq!(timeline.content_count(), 1);
}

#[test]
fn destroyed_timeline_renders_nothing() {
    let mut timeline = Timeline::new(&year_input(), FixedContainer::new(800.0)).expect("timeline");
    timeline
        .load_content(TimelineContent::new("a", vec![month(2)]))
        .expect("load");
    timeline.destroy();

    let mut renderer = NullRenderer::default();
    timeline.render(&mut renderer).expect("render");
    assert_eq!(renderer.last_node_count, 0);
    assert_eq!(
        timeline.unload_content("a").expect_err("destroyed"),
        ChartError::Destroyed
    );
    assert!(timeline.resize().is_ok());
}

#[test]
fn content_label_sits_above_the_earliest_point() {
    let container = FixedContainer::new(800.0);
    let mut timeline = Timeline::new(&year_input(), container.clone()).expect("timeline");
    timeline
        .load_content(TimelineContent::new("release", vec![month(9), month(4)]).with_label("Release"))
        .expect("load");
    container.set_width(600.0);
    timeline.resize().expect("resize");

    let scales = timeline.scales().expect("scales");
    let label = timeline.content()[0].1.label().expect("label node");
    let NodeKind::Text(text) = &timeline.scene().node(label).expect("label").kind else {
        panic!("label is not a text node");
    };
    assert_eq!(text.text, "Release");
    assert_eq!(text.x, scales.x.time_to_pixel(month(4)).expect("pixel"));
    let point = timeline.scene().find_by_class(TIMELINE_POINT_CLASS)[0];
    let NodeKind::Circle(circle) = &timeline.scene().node(point).expect("point").kind else {
        panic!("point is not a circle");
    };
    assert!(text.y < circle.cy);
    assert_eq!(timeline.scene().find_by_class(TIMELINE_LABEL_CLASS), vec![label]);
    assert!(timeline.to_svg().expect("svg").contains(">Release</text>"));
}

#[test]
fn action_legend_does_not_seed_timeline_targets() {
    let input = year_input().with_action_legend(vec![LegendItemInput::new("deploy", "Deploy")]);
    let mut timeline = Timeline::new(&input, FixedContainer::new(800.0)).expect("timeline");
    assert!(timeline.config().shown_targets.is_empty());

    timeline
        .load_content(TimelineContent::new("a", vec![month(2)]))
        .expect("load a");
    let shown: Vec<&str> = timeline
        .config()
        .shown_targets
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(shown, ["a"]);
    assert_eq!(
        timeline.toggle_legend_item("deploy").expect_err("not timeline content"),
        ChartError::InvalidObjectProvided {
            key: "deploy".to_owned()
        }
    );
}
