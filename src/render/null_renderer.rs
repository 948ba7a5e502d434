use crate::error::ChartResult;
use crate::render::{NodeKind, Renderer, Scene};

/// No-op renderer used by tests and headless usage.
///
/// It still validates the scene so tests catch invalid geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_node_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &Scene) -> ChartResult<()> {
        scene.validate()?;
        self.render_count += 1;
        self.last_node_count = scene.len();
        self.last_text_count = count_texts(scene);
        Ok(())
    }
}

fn count_texts(scene: &Scene) -> usize {
    let mut count = 0;
    let mut stack: Vec<_> = scene.roots().to_vec();
    while let Some(id) = stack.pop() {
        if let Some(node) = scene.node(id) {
            if matches!(node.kind, NodeKind::Text(_)) {
                count += 1;
            }
            stack.extend_from_slice(node.children());
        }
    }
    count
}
