//! Vertical date markers drawn across the plot area.

use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, NodeId, NodeKind, Scene, TextHAlign, TextPrimitive};

use super::DatelineInput;
use super::config::ChartConfig;
use super::layout::{Scales, TICK_LABEL_FONT_PX, x_axis_offset};

pub const DATELINE_CLASS: &str = "tracks-dateline";
pub const DATELINE_LINE_CLASS: &str = "tracks-dateline-line";
pub const DATELINE_LABEL_CLASS: &str = "tracks-dateline-label";

const LABEL_OFFSET_PX: f64 = 4.0;

/// Datelines that are drawn, in input order.
pub fn visible_datelines(config: &ChartConfig) -> impl Iterator<Item = &DatelineInput> {
    config.dateline.iter().filter(|dateline| dateline.show_dateline)
}

/// Moves every visible dateline to its current pixel position, reusing
/// the marker nodes from the previous pass.
pub fn translate_datelines(
    scene: &mut Scene,
    group: NodeId,
    config: &ChartConfig,
    scales: &Scales,
) -> ChartResult<()> {
    let top = config.padding.top;
    // Timelines have no band height; keep a visible stub.
    let bottom = x_axis_offset(config).max(top + 1.0);
    let datelines: Vec<&DatelineInput> = visible_datelines(config).collect();
    scene.truncate_children(group, datelines.len())?;

    for (index, dateline) in datelines.into_iter().enumerate() {
        let x = scales.x.time_to_pixel(dateline.value)?;
        let marker = scene.set_child(group, index, NodeKind::Group, DATELINE_CLASS)?;
        scene.set_translate(marker, x, 0.0)?;
        let has_label = !dateline.label.display.is_empty();
        scene.truncate_children(marker, 1 + usize::from(has_label))?;
        scene.set_child(
            marker,
            0,
            NodeKind::Line(LinePrimitive::new(0.0, top, 0.0, bottom, 1.0, Color::DATELINE)),
            DATELINE_LINE_CLASS,
        )?;
        if has_label {
            scene.set_child(
                marker,
                1,
                NodeKind::Text(TextPrimitive::new(
                    dateline.label.display.clone(),
                    LABEL_OFFSET_PX,
                    top + TICK_LABEL_FONT_PX,
                    TICK_LABEL_FONT_PX,
                    Color::DATELINE,
                    TextHAlign::Left,
                )),
                DATELINE_LABEL_CLASS,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DATELINE_CLASS, translate_datelines, visible_datelines};
    use crate::api::config::{ChartKind, normalize};
    use crate::api::layout::{LayoutInputs, compute_layout};
    use crate::api::{ChartInput, DatelineInput};
    use crate::host::FixedContainer;
    use crate::render::{NodeKind, Scene};
    use chrono::{TimeZone, Utc};

    #[test]
    fn hidden_datelines_are_not_drawn() {
        let today = Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap();
        let mut hidden = DatelineInput::new(today, "hidden");
        hidden.show_dateline = false;
        let input = ChartInput::time_series(
            "#chart",
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap(),
        )
        .with_dateline(DatelineInput::new(today, "Today"))
        .with_dateline(hidden);
        let mut config = normalize(ChartKind::Gantt, &input).expect("valid config");
        let scales = compute_layout(
            &FixedContainer::new(800.0),
            &mut config,
            LayoutInputs {
                track_count: 1,
                track_labels: &[],
            },
        )
        .expect("layout");
        assert_eq!(visible_datelines(&config).count(), 1);

        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").expect("root group");
        translate_datelines(&mut scene, root, &config, &scales).expect("draw datelines");
        let markers = scene.find_by_class(DATELINE_CLASS);
        assert_eq!(markers.len(), 1);
        let marker = scene.node(markers[0]).expect("marker node");
        let (start, end) = scales.x.range();
        assert!(marker.translate.0 > start && marker.translate.0 < end);
    }

    #[test]
    fn repeated_passes_reuse_marker_nodes() {
        let today = Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap();
        let input = ChartInput::time_series(
            "#chart",
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap(),
        )
        .with_dateline(DatelineInput::new(today, "Today"));
        let mut config = normalize(ChartKind::Gantt, &input).expect("valid config");
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").expect("root group");

        let mut first = None;
        for width in [800.0, 500.0, 800.0] {
            let scales = compute_layout(
                &FixedContainer::new(width),
                &mut config,
                LayoutInputs {
                    track_count: 1,
                    track_labels: &[],
                },
            )
            .expect("layout");
            translate_datelines(&mut scene, root, &config, &scales).expect("draw datelines");
            let markers = scene.find_by_class(DATELINE_CLASS);
            assert_eq!(markers.len(), 1);
            assert_eq!(*first.get_or_insert(markers[0]), markers[0]);
        }
        assert_eq!(scene.slot_count(), scene.len());
    }
}
