use std::fmt;
use std::time::Instant;

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};
use crate::host::HostContainer;
use crate::render::{CanvasLayerStack, Renderer, Scene, SvgRenderer};

use super::canvas::{CanvasHandles, create_canvas, remove_canvas, translate_canvas};
use super::config::{ChartConfig, ChartKind, normalize};
use super::events::EventBinding;
use super::layout::{LayoutInputs, Scales, compute_layout, determine_height, set_canvas_height};
use super::legend::toggle_target;
use super::timeline_content::TimelineContentController;
use super::{ChartInput, ContentKey, OneOrMany, TimelineContent};

/// A timeline: point markers along a single time axis.
///
/// Content is kept in one flat sequence in load order. The X domain is
/// fixed at construction; loading content never changes it.
pub struct Timeline {
    container: Option<Box<dyn HostContainer>>,
    config: ChartConfig,
    scales: Option<Scales>,
    scene: Scene,
    handles: Option<CanvasHandles>,
    content: Vec<(ContentKey, TimelineContentController)>,
    events: EventBinding,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("bind_to", &self.config.bind_to)
            .field("content", &self.keys().collect::<Vec<_>>())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

impl Timeline {
    pub fn new(input: &ChartInput, container: impl HostContainer + 'static) -> ChartResult<Self> {
        let config = normalize(ChartKind::Timeline, input)?;
        let mut timeline = Self {
            container: Some(Box::new(container)),
            config,
            scales: None,
            scene: Scene::new(),
            handles: None,
            content: Vec::new(),
            events: EventBinding::default(),
        };
        timeline.config.height = determine_height(&timeline.config, 0);
        let scales = timeline.layout()?;
        timeline.handles = Some(create_canvas(
            &mut timeline.scene,
            &timeline.config,
            &CanvasLayerStack::timeline(),
        )?);
        timeline.translate(scales)?;
        timeline.events.attach(timeline.config.throttle);
        debug!(
            bind_to = %timeline.config.bind_to,
            canvas_width = timeline.config.canvas_width,
            "timeline created"
        );
        Ok(timeline)
    }

    /// Appends one item or a batch; every key is checked first.
    pub fn load_content(
        &mut self,
        content: impl Into<OneOrMany<TimelineContent>>,
    ) -> ChartResult<&mut Self> {
        let handles = self.live_handles()?;
        let items = content.into().into_vec();

        let mut batch_keys = IndexSet::with_capacity(items.len());
        let mut controllers = Vec::with_capacity(items.len());
        for item in items {
            let key = ContentKey::new(item.key.clone());
            if self.position(&key).is_some() || !batch_keys.insert(key.clone()) {
                return Err(ChartError::DuplicateContentKey {
                    key: key.to_string(),
                });
            }
            controllers.push((key, TimelineContentController::new(item)?));
        }

        for (key, mut controller) in controllers {
            controller.load(&mut self.scene, &handles)?;
            self.config.shown_targets.insert(key.to_string());
            debug!(key = %key, content_count = self.content.len() + 1, "load timeline content");
            self.content.push((key, controller));
        }

        self.update_geometry();
        self.resize()?;
        Ok(self)
    }

    /// Removes one item or a batch by key; unknown keys fail before any
    /// removal.
    pub fn unload_content(
        &mut self,
        keys: impl Into<OneOrMany<ContentKey>>,
    ) -> ChartResult<&mut Self> {
        self.live_handles()?;
        let keys = keys.into().into_vec();

        let mut seen = IndexSet::with_capacity(keys.len());
        for key in &keys {
            if self.position(key).is_none() || !seen.insert(key) {
                return Err(ChartError::InvalidObjectProvided {
                    key: key.to_string(),
                });
            }
        }

        for key in &keys {
            let index = self
                .position(key)
                .ok_or_else(|| ChartError::InvalidObjectProvided {
                    key: key.to_string(),
                })?;
            let (_, mut controller) = self.content.remove(index);
            controller.unload(&mut self.scene)?;
            self.config.shown_targets.shift_remove(key.as_str());
            debug!(key = %key, index, content_count = self.content.len(), "unload timeline content");
        }

        self.update_geometry();
        self.resize()?;
        Ok(self)
    }

    /// Re-reads the container width and repositions axis and content.
    /// Does nothing once destroyed.
    pub fn resize(&mut self) -> ChartResult<&mut Self> {
        if self.is_destroyed() {
            trace!("resize skipped on destroyed timeline");
            return Ok(self);
        }
        let scales = self.layout()?;
        self.translate(scales)?;
        debug!(
            canvas_width = self.config.canvas_width,
            canvas_height = self.config.canvas_height,
            content_count = self.content.len(),
            "timeline resized"
        );
        Ok(self)
    }

    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.events.detach();
        if let Some(handles) = self.handles.take() {
            if let Err(err) = remove_canvas(&mut self.scene, &handles) {
                trace!(error = %err, "canvas already detached");
            }
        }
        debug!(
            bind_to = %self.config.bind_to,
            content_count = self.content.len(),
            "timeline destroyed"
        );
        self.container = None;
        self.scales = None;
        self.scene.clear();
        self.content.clear();
        self.config = ChartConfig::default();
    }

    /// Shows or hides the item loaded under `key`.
    pub fn toggle_legend_item(&mut self, key: &str) -> ChartResult<bool> {
        self.live_handles()?;
        let shown = toggle_target(
            &mut self.config.shown_targets,
            self.content.iter().map(|(key, _)| key.as_str()),
            key,
        )?;
        for (content_key, controller) in &self.content {
            controller.set_visible(
                &mut self.scene,
                self.config.shown_targets.contains(content_key.as_str()),
            )?;
        }
        debug!(key, shown, "toggle timeline item");
        Ok(shown)
    }

    pub fn handle_legend_click(&mut self, key: &str) -> ChartResult<Option<bool>> {
        if !self.events.is_attached() {
            return Ok(None);
        }
        self.toggle_legend_item(key).map(Some)
    }

    pub fn handle_window_resize(&mut self, now: Instant) -> ChartResult<bool> {
        if !self.events.on_window_resize(now) {
            return Ok(false);
        }
        self.resize()?;
        Ok(true)
    }

    pub fn poll_resize(&mut self, now: Instant) -> ChartResult<bool> {
        if !self.events.poll_resize(now) {
            return Ok(false);
        }
        self.resize()?;
        Ok(true)
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> ChartResult<()> {
        renderer.render(&self.scene)
    }

    pub fn to_svg(&self) -> ChartResult<String> {
        let mut renderer = SvgRenderer::new();
        self.render(&mut renderer)?;
        Ok(renderer.into_output())
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn scales(&self) -> Option<Scales> {
        self.scales
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn keys(&self) -> impl Iterator<Item = &ContentKey> {
        self.content.iter().map(|(key, _)| key)
    }

    #[must_use]
    pub fn content(&self) -> &[(ContentKey, TimelineContentController)] {
        &self.content
    }

    #[must_use]
    pub fn content_count(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.container.is_none()
    }

    #[must_use]
    pub fn events_attached(&self) -> bool {
        self.events.is_attached()
    }

    fn position(&self, key: &ContentKey) -> Option<usize> {
        self.content.iter().position(|(candidate, _)| candidate == key)
    }

    fn live_handles(&self) -> ChartResult<CanvasHandles> {
        match (&self.container, &self.handles) {
            (Some(_), Some(handles)) => Ok(handles.clone()),
            _ => Err(ChartError::Destroyed),
        }
    }

    fn update_geometry(&mut self) {
        self.config.height = determine_height(&self.config, 0);
        set_canvas_height(&mut self.config);
    }

    fn layout(&mut self) -> ChartResult<Scales> {
        let container = self.container.as_deref().ok_or(ChartError::Destroyed)?;
        compute_layout(
            container,
            &mut self.config,
            LayoutInputs {
                track_count: 0,
                track_labels: &[],
            },
        )
    }

    fn translate(&mut self, scales: Scales) -> ChartResult<()> {
        if let Some(handles) = &self.handles {
            translate_canvas(&mut self.scene, handles, &self.config, &scales)?;
        }
        for (_, controller) in &self.content {
            controller.resize(&mut self.scene, &self.config, &scales)?;
        }
        self.scales = Some(scales);
        Ok(())
    }
}
