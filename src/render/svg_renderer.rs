use std::fmt::Write as _;

use crate::error::{ChartError, ChartResult};
use crate::render::{NodeId, NodeKind, Renderer, Scene, SceneNode};

/// Serializes the scene into standalone SVG markup.
///
/// Container wrappers are host-side elements and are skipped; each canvas
/// becomes one `<svg>` document appended to `output`.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    fn write_node(&mut self, scene: &Scene, id: NodeId) -> std::fmt::Result {
        let Some(node) = scene.node(id) else {
            return Ok(());
        };
        match &node.kind {
            NodeKind::Container => {
                for child in node.children() {
                    self.write_node(scene, *child)?;
                }
            }
            NodeKind::Canvas { width, height } => {
                write!(
                    self.output,
                    r#"<svg xmlns="http://www.w3.org/2000/svg" role="img" class="{}" width="{}" height="{}""#,
                    escape(&node.class),
                    fmt_num(*width),
                    fmt_num(*height)
                )?;
                self.write_common_attrs(node)?;
                self.output.push('>');
                self.write_children(scene, node)?;
                self.output.push_str("</svg>");
            }
            NodeKind::Group => {
                write!(self.output, r#"<g class="{}""#, escape(&node.class))?;
                self.write_common_attrs(node)?;
                self.output.push('>');
                self.write_children(scene, node)?;
                self.output.push_str("</g>");
            }
            NodeKind::ClipPath {
                id,
                x,
                y,
                width,
                height,
            } => {
                write!(
                    self.output,
                    r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    escape(id),
                    fmt_num(*x),
                    fmt_num(*y),
                    fmt_num(*width),
                    fmt_num(*height)
                )?;
            }
            NodeKind::Line(line) => {
                write!(
                    self.output,
                    r#"<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}""#,
                    escape(&node.class),
                    fmt_num(line.x1),
                    fmt_num(line.y1),
                    fmt_num(line.x2),
                    fmt_num(line.y2),
                    line.color.to_hex(),
                    fmt_num(line.stroke_width),
                    fmt_num(line.color.alpha)
                )?;
                self.write_common_attrs(node)?;
                self.output.push_str("/>");
            }
            NodeKind::Rect(rect) => {
                write!(
                    self.output,
                    r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}""#,
                    escape(&node.class),
                    fmt_num(rect.x),
                    fmt_num(rect.y),
                    fmt_num(rect.width),
                    fmt_num(rect.height),
                    rect.fill.to_hex(),
                    fmt_num(rect.fill.alpha)
                )?;
                self.write_common_attrs(node)?;
                self.output.push_str("/>");
            }
            NodeKind::Circle(circle) => {
                write!(
                    self.output,
                    r#"<circle class="{}" cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="{}""#,
                    escape(&node.class),
                    fmt_num(circle.cx),
                    fmt_num(circle.cy),
                    fmt_num(circle.radius),
                    circle.fill.to_hex(),
                    fmt_num(circle.fill.alpha)
                )?;
                self.write_common_attrs(node)?;
                self.output.push_str("/>");
            }
            NodeKind::Text(text) => {
                write!(
                    self.output,
                    r#"<text class="{}" x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}""#,
                    escape(&node.class),
                    fmt_num(text.x),
                    fmt_num(text.y),
                    fmt_num(text.font_size_px),
                    text.color.to_hex(),
                    text.h_align.svg_anchor()
                )?;
                self.write_common_attrs(node)?;
                write!(self.output, ">{}</text>", escape(&text.text))?;
            }
        }
        Ok(())
    }

    fn write_children(&mut self, scene: &Scene, node: &SceneNode) -> std::fmt::Result {
        for child in node.children() {
            self.write_node(scene, *child)?;
        }
        Ok(())
    }

    fn write_common_attrs(&mut self, node: &SceneNode) -> std::fmt::Result {
        let (x, y) = node.translate;
        if x != 0.0 || y != 0.0 {
            write!(
                self.output,
                r#" transform="translate({},{})""#,
                fmt_num(x),
                fmt_num(y)
            )?;
        }
        if let Some(clip) = &node.clip_path {
            write!(self.output, r#" clip-path="url(#{})""#, escape(clip))?;
        }
        if !node.visible {
            self.output.push_str(r#" display="none""#);
        }
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()> {
        scene.validate()?;
        self.output.clear();
        for root in scene.roots() {
            self.write_node(scene, *root)
                .map_err(|_| ChartError::InvalidData("failed to write svg markup".to_owned()))?;
        }
        Ok(())
    }
}

fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{SvgRenderer, escape, fmt_num};
    use crate::render::{Color, NodeKind, Renderer, Scene, TextHAlign, TextPrimitive};

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333");
    }

    #[test]
    fn text_content_is_escaped() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn container_is_skipped_and_canvas_emitted() {
        let mut scene = Scene::new();
        let container = scene
            .append_root(NodeKind::Container, "tracks-container")
            .unwrap();
        let canvas = scene
            .append(
                container,
                NodeKind::Canvas {
                    width: 200.0,
                    height: 100.0,
                },
                "tracks-canvas",
            )
            .unwrap();
        let label = scene
            .append(
                canvas,
                NodeKind::Text(TextPrimitive::new(
                    "R&D",
                    4.0,
                    8.0,
                    12.0,
                    Color::BLACK,
                    TextHAlign::Left,
                )),
                "label",
            )
            .unwrap();
        scene.set_visible(label, false).unwrap();

        let mut renderer = SvgRenderer::new();
        renderer.render(&scene).unwrap();
        let svg = renderer.output();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="200" height="100""#));
        assert!(svg.contains("R&amp;D"));
        assert!(svg.contains(r#"display="none""#));
        assert!(!svg.contains("tracks-container"));
    }
}
