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
use super::gantt_track::TrackController;
use super::layout::{
    LayoutInputs, Scales, compute_layout, determine_height, set_canvas_height, update_axes_domain,
};
use super::legend::toggle_target;
use super::tracks::{TrackCollection, prepare_load_at_index};
use super::{ChartInput, ContentKey, GanttContent, OneOrMany};

/// A Gantt chart: ordered rows of tasks and actions on a time axis.
///
/// Every mutator runs to completion synchronously. After `destroy` the
/// instance is back in its unconstructed shape: `resize` becomes a no-op
/// and other mutators fail with [`ChartError::Destroyed`].
pub struct Gantt {
    container: Option<Box<dyn HostContainer>>,
    config: ChartConfig,
    scales: Option<Scales>,
    scene: Scene,
    handles: Option<CanvasHandles>,
    tracks: TrackCollection<TrackController>,
    events: EventBinding,
}

impl fmt::Debug for Gantt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gantt")
            .field("bind_to", &self.config.bind_to)
            .field("tracks", &self.tracks.keys())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

impl Gantt {
    /// Validates `input`, binds to `container` and draws the empty chart.
    pub fn new(input: &ChartInput, container: impl HostContainer + 'static) -> ChartResult<Self> {
        let config = normalize(ChartKind::Gantt, input)?;
        let mut gantt = Self {
            container: Some(Box::new(container)),
            config,
            scales: None,
            scene: Scene::new(),
            handles: None,
            tracks: TrackCollection::new(),
            events: EventBinding::default(),
        };
        gantt.config.height = determine_height(&gantt.config, 0);
        let scales = gantt.layout()?;
        gantt.handles = Some(create_canvas(
            &mut gantt.scene,
            &gantt.config,
            &CanvasLayerStack::gantt(),
        )?);
        gantt.translate(scales)?;
        gantt.events.attach(gantt.config.throttle);
        debug!(
            bind_to = %gantt.config.bind_to,
            canvas_width = gantt.config.canvas_width,
            canvas_height = gantt.config.canvas_height,
            "gantt created"
        );
        Ok(gantt)
    }

    /// Loads one track or a batch of tracks.
    ///
    /// The whole batch is checked before anything is inserted: a duplicate
    /// key or malformed item leaves the chart unchanged.
    pub fn load_content(
        &mut self,
        content: impl Into<OneOrMany<GanttContent>>,
    ) -> ChartResult<&mut Self> {
        let handles = self.live_handles()?;
        let items = content.into().into_vec();

        let mut batch_keys = IndexSet::with_capacity(items.len());
        let mut controllers = Vec::with_capacity(items.len());
        for item in items {
            let key = ContentKey::new(item.key.clone());
            if self.tracks.contains(&key) || !batch_keys.insert(key.clone()) {
                return Err(ChartError::DuplicateContentKey {
                    key: key.to_string(),
                });
            }
            controllers.push((key, TrackController::new(item)?));
        }

        for (key, mut controller) in controllers {
            let index = prepare_load_at_index(self.tracks.len(), controller.content().load_at_index);
            let node = controller.load(&mut self.scene, &handles, index)?;
            let index = self.tracks.insert(index, key.clone(), controller, node);
            debug!(key = %key, index, track_count = self.tracks.len(), "load track");
        }

        self.update_track_geometry();
        self.resize()?;
        self.redraw_tracks()?;
        Ok(self)
    }

    /// Unloads one track or a batch of tracks by key.
    ///
    /// Fails with [`ChartError::InvalidObjectProvided`] before touching any
    /// sequence when one of the keys is not loaded.
    pub fn unload_content(
        &mut self,
        keys: impl Into<OneOrMany<ContentKey>>,
    ) -> ChartResult<&mut Self> {
        self.live_handles()?;
        let keys = keys.into().into_vec();

        let mut seen = IndexSet::with_capacity(keys.len());
        for key in &keys {
            if !self.tracks.contains(key) || !seen.insert(key) {
                return Err(ChartError::InvalidObjectProvided {
                    key: key.to_string(),
                });
            }
        }

        for key in &keys {
            let (index, mut controller, node) = self.tracks.remove(key)?;
            controller.unload(&mut self.scene, node)?;
            debug!(key = %key, index, track_count = self.tracks.len(), "unload track");
        }

        self.update_track_geometry();
        self.resize()?;
        Ok(self)
    }

    /// Re-reads the container width and repositions every drawn element.
    ///
    /// Does nothing once the chart is destroyed.
    pub fn resize(&mut self) -> ChartResult<&mut Self> {
        if self.is_destroyed() {
            trace!("resize skipped on destroyed gantt");
            return Ok(self);
        }
        let scales = self.layout()?;
        self.translate(scales)?;
        debug!(
            canvas_width = self.config.canvas_width,
            canvas_height = self.config.canvas_height,
            track_count = self.tracks.len(),
            "gantt resized"
        );
        Ok(self)
    }

    /// Detaches event handlers, removes the canvas and resets this chart.
    ///
    /// Other charts are unaffected; see `ChartRegistry::destroy_all` for
    /// bulk teardown.
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
            track_count = self.tracks.len(),
            "gantt destroyed"
        );
        self.container = None;
        self.scales = None;
        self.scene.clear();
        self.tracks.clear();
        self.config = ChartConfig::default();
    }

    /// Shows or hides every action tagged with `key`; returns whether the
    /// key is now shown.
    pub fn toggle_legend_item(&mut self, key: &str) -> ChartResult<bool> {
        self.live_handles()?;
        let shown = toggle_target(
            &mut self.config.shown_targets,
            self.config.action_legend.iter().map(|item| item.key.as_str()),
            key,
        )?;
        for controller in self.tracks.controllers() {
            controller.apply_shown_targets(
                &mut self.scene,
                &self.config.shown_targets,
                self.config.show_action_legend,
            )?;
        }
        debug!(key, shown, "toggle legend item");
        Ok(shown)
    }

    /// Legend click from the host; ignored while handlers are detached.
    pub fn handle_legend_click(&mut self, key: &str) -> ChartResult<Option<bool>> {
        if !self.events.is_attached() {
            return Ok(None);
        }
        self.toggle_legend_item(key).map(Some)
    }

    /// Host window-resize event, rate limited by the configured throttle.
    /// Returns whether a resize ran.
    pub fn handle_window_resize(&mut self, now: Instant) -> ChartResult<bool> {
        if !self.events.on_window_resize(now) {
            return Ok(false);
        }
        self.resize()?;
        Ok(true)
    }

    /// Delivers a throttled trailing resize once it is due.
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

    /// Renders the current scene as a standalone SVG document.
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

    #[must_use]
    pub fn tracks(&self) -> &TrackCollection<TrackController> {
        &self.tracks
    }

    #[must_use]
    pub fn keys(&self) -> &[ContentKey] {
        self.tracks.keys()
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.container.is_none()
    }

    #[must_use]
    pub fn events_attached(&self) -> bool {
        self.events.is_attached()
    }

    fn live_handles(&self) -> ChartResult<CanvasHandles> {
        match (&self.container, &self.handles) {
            (Some(_), Some(handles)) => Ok(handles.clone()),
            _ => Err(ChartError::Destroyed),
        }
    }

    /// Track count changed: Y domain, band height, canvas height.
    fn update_track_geometry(&mut self) {
        update_axes_domain(
            &mut self.config,
            self.tracks.keys().iter().map(ContentKey::as_str),
        );
        self.config.height = determine_height(&self.config, self.tracks.len());
        set_canvas_height(&mut self.config);
    }

    fn layout(&mut self) -> ChartResult<Scales> {
        let container = self.container.as_deref().ok_or(ChartError::Destroyed)?;
        let labels: Vec<&str> = self
            .tracks
            .controllers()
            .iter()
            .map(TrackController::label_text)
            .collect();
        compute_layout(
            container,
            &mut self.config,
            LayoutInputs {
                track_count: self.tracks.len(),
                track_labels: &labels,
            },
        )
    }

    fn translate(&mut self, scales: Scales) -> ChartResult<()> {
        if let Some(handles) = &self.handles {
            translate_canvas(&mut self.scene, handles, &self.config, &scales)?;
        }
        for (index, (_, controller, node)) in self.tracks.iter().enumerate() {
            controller.resize(&mut self.scene, node, index, &self.config, &scales)?;
        }
        self.scales = Some(scales);
        Ok(())
    }

    fn redraw_tracks(&mut self) -> ChartResult<()> {
        let scales = self.scales.ok_or(ChartError::Destroyed)?;
        for (index, (_, controller, node)) in self.tracks.iter_mut().enumerate() {
            controller.redraw(&mut self.scene, node, index, &self.config, &scales)?;
        }
        Ok(())
    }
}
