use chrono::{TimeZone, Utc};
use tracks_rs::api::{
    AxisInput, ChartInput, ChartKind, Gantt, Timeline, XAxisInput, normalize, validate,
};
use tracks_rs::core::AxisValue;
use tracks_rs::error::ChartError;
use tracks_rs::host::FixedContainer;

fn limits() -> XAxisInput {
    XAxisInput::new(
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap(),
    )
}

#[test]
fn missing_input_is_no_data() {
    assert_eq!(validate(None), Err(ChartError::NoData));
    assert_eq!(
        Gantt::new(&ChartInput::default(), FixedContainer::new(800.0)).expect_err("empty"),
        ChartError::NoData
    );
}

#[test]
fn missing_bind_target_fails_before_anything_is_drawn() {
    let input = ChartInput {
        axis: Some(AxisInput { x: Some(limits()) }),
        ..ChartInput::default()
    };
    let err = Gantt::new(&input, FixedContainer::new(800.0)).expect_err("no bindTo");
    assert_eq!(err, ChartError::NoBindTarget);
    assert_eq!(err.code(), "NO_BIND_TARGET");
}

#[test]
fn missing_axis_and_limits_are_reported_in_order() {
    let input = ChartInput {
        bind_to: Some("#chart".to_owned()),
        ..ChartInput::default()
    };
    assert_eq!(validate(Some(&input)), Err(ChartError::NoAxisInfo));

    let input = ChartInput {
        bind_to: Some("#chart".to_owned()),
        axis: Some(AxisInput { x: None }),
        ..ChartInput::default()
    };
    assert_eq!(validate(Some(&input)), Err(ChartError::NoAxisInfo));

    let mut x = limits();
    x.upper_limit = None;
    let input = ChartInput {
        bind_to: Some("#chart".to_owned()),
        axis: Some(AxisInput { x: Some(x) }),
        ..ChartInput::default()
    };
    assert_eq!(validate(Some(&input)), Err(ChartError::NoAxisLimitInfo));
}

#[test]
fn plain_string_limit_is_not_a_date() {
    let mut x = limits();
    x.lower_limit = Some(AxisValue::from("2023-01-01"));
    let input = ChartInput {
        bind_to: Some("#chart".to_owned()),
        axis: Some(AxisInput { x: Some(x) }),
        ..ChartInput::default()
    };
    let err = Timeline::new(&input, FixedContainer::new(800.0)).expect_err("string limit");
    assert_eq!(err, ChartError::InvalidAxisTypeValues);
    assert_eq!(err.code(), "INVALID_AXIS_TYPE_VALUES");
}

#[test]
fn validation_does_not_mutate_input() {
    let input = ChartInput::time_series(
        "#chart",
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap(),
    );
    let copy = input.clone();
    validate(Some(&input)).expect("valid input");
    let config = normalize(ChartKind::Gantt, &input).expect("normalize");
    assert_eq!(input, copy);
    assert_eq!(config.bind_to, "#chart");
}

#[test]
fn reversed_limits_are_rejected() {
    let input = ChartInput::time_series(
        "#chart",
        Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    );
    assert!(matches!(
        normalize(ChartKind::Timeline, &input),
        Err(ChartError::InvalidData(_))
    ));
}
