use chrono::{DateTime, TimeZone, Utc};
use tracks_rs::api::{
    ChartInput, DatelineInput, Gantt, GanttContent, LocaleInput, TaskInput, TicksInput,
    Timeline, TimelineContent,
};
use tracks_rs::host::FixedContainer;

fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap()
}

#[test]
fn gantt_svg_contains_tracks_axis_and_clip_path() {
    let input = ChartInput::time_series("#gantt", date(1), date(31))
        .with_dateline(DatelineInput::new(date(15), "Today"));
    let mut gantt = Gantt::new(&input, FixedContainer::new(1000.0)).expect("gantt");
    gantt
        .load_content(
            GanttContent::new("build", "Build & test")
                .with_task(TaskInput::new("compile", date(2), date(9))),
        )
        .expect("load");

    let svg = gantt.to_svg().expect("svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("<clipPath"));
    assert!(svg.contains(&gantt.config().clip_path_id));
    assert!(svg.contains("<rect"));
    assert!(svg.contains("Build &amp; test"));
    assert!(svg.contains("Today"));
}

#[test]
fn explicit_ticks_use_format_and_locale() {
    let mut input = ChartInput::time_series("#timeline", date(1), date(31)).with_locale(
        LocaleInput {
            name: Some("es-ES".to_owned()),
            months: Some(
                [
                    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
                    "septiembre", "octubre", "noviembre", "diciembre",
                ]
                .map(str::to_owned)
                .to_vec(),
            ),
            short_months: None,
        },
    );
    if let Some(x) = input.axis.as_mut().and_then(|axis| axis.x.as_mut()) {
        x.ticks = Some(TicksInput {
            values: vec![date(10), date(20)],
            format: Some("%d %B".to_owned()),
        });
    }
    let mut timeline = Timeline::new(&input, FixedContainer::new(800.0)).expect("timeline");
    timeline
        .load_content(TimelineContent::new("a", vec![date(12)]))
        .expect("load");

    let svg = timeline.to_svg().expect("svg");
    assert!(svg.contains("10 enero"));
    assert!(svg.contains("20 enero"));
    assert!(svg.contains("<circle"));
}

#[test]
fn hidden_labels_are_not_displayed() {
    let input = ChartInput::time_series("#gantt", date(1), date(31)).with_show_label(false);
    let mut gantt = Gantt::new(&input, FixedContainer::new(1000.0)).expect("gantt");
    gantt
        .load_content(GanttContent::new("a", "Alpha"))
        .expect("load");
    assert_eq!(gantt.config().axis_sizes.track_label_width, 0.0);
    let svg = gantt.to_svg().expect("svg");
    assert!(svg.contains("display=\"none\""));
}
