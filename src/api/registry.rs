use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::host::HostContainer;

use super::{ChartInput, Gantt, Timeline};

/// Handle of a chart owned by a [`ChartRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(u64);

impl ChartId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart-{}", self.0)
    }
}

#[derive(Debug)]
pub enum ChartInstance {
    Gantt(Gantt),
    Timeline(Timeline),
}

impl ChartInstance {
    pub fn destroy(&mut self) {
        match self {
            Self::Gantt(gantt) => gantt.destroy(),
            Self::Timeline(timeline) => timeline.destroy(),
        }
    }

    pub fn resize(&mut self) -> ChartResult<()> {
        match self {
            Self::Gantt(gantt) => gantt.resize().map(|_| ()),
            Self::Timeline(timeline) => timeline.resize().map(|_| ()),
        }
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::Gantt(gantt) => gantt.is_destroyed(),
            Self::Timeline(timeline) => timeline.is_destroyed(),
        }
    }
}

/// Owner of live charts, kept in construction order.
///
/// Teardown is explicit: `destroy` drops one chart, `destroy_all` tears
/// down every chart from the most recently created back to the first.
/// A chart destroyed through its own `destroy` no longer counts as live
/// and is dropped on the next mutating registry call.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    next_id: u64,
    charts: IndexMap<ChartId, ChartInstance>,
}

impl ChartRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_gantt(
        &mut self,
        input: &ChartInput,
        container: impl HostContainer + 'static,
    ) -> ChartResult<ChartId> {
        self.prune();
        let gantt = Gantt::new(input, container)?;
        Ok(self.register(ChartInstance::Gantt(gantt)))
    }

    pub fn create_timeline(
        &mut self,
        input: &ChartInput,
        container: impl HostContainer + 'static,
    ) -> ChartResult<ChartId> {
        self.prune();
        let timeline = Timeline::new(input, container)?;
        Ok(self.register(ChartInstance::Timeline(timeline)))
    }

    pub fn get(&self, id: ChartId) -> ChartResult<&ChartInstance> {
        self.charts
            .get(&id)
            .filter(|chart| !chart.is_destroyed())
            .ok_or(ChartError::UnknownChart(id))
    }

    pub fn gantt_mut(&mut self, id: ChartId) -> ChartResult<&mut Gantt> {
        self.prune();
        match self.charts.get_mut(&id) {
            Some(ChartInstance::Gantt(gantt)) => Ok(gantt),
            _ => Err(ChartError::UnknownChart(id)),
        }
    }

    pub fn timeline_mut(&mut self, id: ChartId) -> ChartResult<&mut Timeline> {
        self.prune();
        match self.charts.get_mut(&id) {
            Some(ChartInstance::Timeline(timeline)) => Ok(timeline),
            _ => Err(ChartError::UnknownChart(id)),
        }
    }

    /// Destroys a single chart and forgets it.
    pub fn destroy(&mut self, id: ChartId) -> ChartResult<()> {
        self.prune();
        let mut chart = self
            .charts
            .shift_remove(&id)
            .ok_or(ChartError::UnknownChart(id))?;
        chart.destroy();
        debug!(chart = %id, live = self.charts.len(), "destroy chart");
        Ok(())
    }

    /// Destroys every chart in reverse construction order; returns how many
    /// were torn down.
    pub fn destroy_all(&mut self) -> usize {
        self.prune();
        let mut destroyed = 0;
        while let Some((id, mut chart)) = self.charts.pop() {
            chart.destroy();
            destroyed += 1;
            debug!(chart = %id, "destroy chart");
        }
        debug!(destroyed, "destroyed all charts");
        destroyed
    }

    /// Resizes every live chart in construction order.
    pub fn resize_all(&mut self) -> ChartResult<()> {
        self.prune();
        for chart in self.charts.values_mut() {
            chart.resize()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live().next().is_none()
    }

    #[must_use]
    pub fn contains(&self, id: ChartId) -> bool {
        self.get(id).is_ok()
    }

    /// Live chart ids in construction order.
    pub fn ids(&self) -> impl Iterator<Item = ChartId> + '_ {
        self.live().map(|(id, _)| *id)
    }

    fn live(&self) -> impl Iterator<Item = (&ChartId, &ChartInstance)> + '_ {
        self.charts.iter().filter(|(_, chart)| !chart.is_destroyed())
    }

    /// Forgets charts that were torn down through their own `destroy`.
    fn prune(&mut self) {
        let before = self.charts.len();
        self.charts.retain(|_, chart| !chart.is_destroyed());
        let pruned = before - self.charts.len();
        if pruned > 0 {
            debug!(
                pruned,
                live = self.charts.len(),
                "drop charts destroyed outside the registry"
            );
        }
    }

    fn register(&mut self, chart: ChartInstance) -> ChartId {
        let id = ChartId(self.next_id);
        self.next_id += 1;
        self.charts.insert(id, chart);
        debug!(chart = %id, live = self.charts.len(), "register chart");
        id
    }
}
