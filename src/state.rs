use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the plant is anchored on the (abstract) canvas. Renderers may
/// scale these freely; only relative placement matters to the engine.
pub const BASE_X: f64 = 160.0;
pub const BASE_Y: f64 = 300.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SegmentId(u64);

impl SegmentId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete lifecycle label, derived each tick from growth and structural
/// health. `Withering` and `Dead` override the growth-threshold scan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    Seed,
    Sprout,
    Young,
    Mature,
    Flowering,
    Harvestable,
    Withering,
    Dead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    Seed {
        x: f64,
        y: f64,
    },
    Stem {
        x: f64,
        y: f64,
        height: f64,
        width: f64,
    },
    Leaf {
        x: f64,
        y: f64,
        angle: f64,
        current_size: f64,
        target_size: f64,
    },
    Flower {
        x: f64,
        y: f64,
        size: f64,
    },
    /// A bud keeps a non-owning reference to the leaf it grew from. The
    /// leaf may be pruned while the bud survives, so the id is resolved
    /// leniently everywhere.
    Bud {
        x: f64,
        y: f64,
        size: f64,
        angle: f64,
        leaf_id: SegmentId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    #[serde(default)]
    pub withered: bool,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, SegmentKind::Leaf { .. })
    }

    pub fn is_bud(&self) -> bool {
        matches!(self.kind, SegmentKind::Bud { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    pub stage: Stage,
    pub growth: f64,
    pub hydration: f64,
    /// Hours spent at exactly zero hydration; drives withering. Resets the
    /// moment hydration rises above zero.
    pub time_at_zero_hydration: f64,
    /// Insertion order is spawn order; withering consumes it newest-first.
    pub segments: Vec<Segment>,
    next_segment_id: u64,
}

impl PlantState {
    /// A freshly planted seed: half hydration, a single seed segment.
    pub fn new() -> Self {
        let mut plant = Self {
            stage: Stage::Seed,
            growth: 0.0,
            hydration: 0.5,
            time_at_zero_hydration: 0.0,
            segments: Vec::new(),
            next_segment_id: 0,
        };
        plant.push_segment(SegmentKind::Seed { x: BASE_X, y: BASE_Y });
        plant
    }

    pub fn push_segment(&mut self, kind: SegmentKind) -> SegmentId {
        let id = SegmentId(self.next_segment_id);
        self.next_segment_id += 1;
        self.segments.push(Segment {
            id,
            withered: false,
            kind,
        });
        id
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn remove_segment(&mut self, id: SegmentId) -> Option<Segment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        Some(self.segments.remove(index))
    }

    pub fn any_withered(&self) -> bool {
        self.segments.iter().any(|s| s.withered)
    }

    pub fn all_withered(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| s.withered)
    }

    pub fn withered_count(&self) -> usize {
        self.segments.iter().filter(|s| s.withered).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_leaf()).count()
    }

    pub fn healthy_leaf_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.is_leaf() && !s.withered)
            .count()
    }

    pub fn flower_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Flower { .. }))
            .count()
    }

    pub fn has_bud_for(&self, leaf: SegmentId) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s.kind, SegmentKind::Bud { leaf_id, .. } if leaf_id == leaf))
    }

    /// First leaf in spawn order with no bud attached; buds spawn there.
    pub fn first_leaf_without_bud(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.is_leaf())
            .find(|leaf| !self.has_bud_for(leaf.id))
    }

    pub fn every_leaf_has_bud(&self) -> bool {
        self.leaf_count() > 0 && self.first_leaf_without_bud().is_none()
    }

    /// Re-establishes the id counter above every stored segment id. Called
    /// after deserialization so documents merged from older layouts can
    /// never hand out a duplicate id.
    pub fn ensure_id_headroom(&mut self) {
        if let Some(max) = self.segments.iter().map(|s| s.id.raw()).max() {
            self.next_segment_id = self.next_segment_id.max(max + 1);
        }
    }
}

impl Default for PlantState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub is_raining: bool,
}

/// Ambient inputs supplied by out-of-scope collaborators (weather client,
/// settings UI). Everything is optional; the engine substitutes defaults
/// rather than failing when a field is unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    #[serde(default)]
    pub is_day: bool,
    #[serde(default)]
    pub weather: Option<CurrentWeather>,
    #[serde(default)]
    pub user_location: Option<String>,
    #[serde(default)]
    pub sunrise: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sunset: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub plant: PlantState,
    pub last_update: DateTime<Utc>,
    pub tea_leaves_harvested: u64,
    pub environment: EnvironmentState,
}

impl GameState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            plant: PlantState::new(),
            last_update: now,
            tea_leaves_harvested: 0,
            environment: EnvironmentState::default(),
        }
    }

    /// Additive hydration bump, clamped to [0, 1]. Ignored once the plant
    /// is dead; the state is frozen until a reset.
    pub fn water(&mut self, amount: f64) {
        if self.plant.stage == Stage::Dead {
            return;
        }
        self.plant.hydration = (self.plant.hydration + amount).clamp(0.0, 1.0);
        if self.plant.hydration > 0.0 {
            self.plant.time_at_zero_hydration = 0.0;
        }
    }

    /// Removes a segment outright. Buds referencing a pruned leaf keep
    /// their dangling `leaf_id`; that is expected and harmless.
    pub fn prune(&mut self, id: SegmentId) -> Result<Segment, ActionError> {
        self.plant
            .remove_segment(id)
            .ok_or(ActionError::UnknownSegment(id))
    }

    /// Picks a bud, incrementing the harvest counter. Returns the new
    /// total.
    pub fn harvest(&mut self, id: SegmentId) -> Result<u64, ActionError> {
        match self.plant.segment(id) {
            None => return Err(ActionError::UnknownSegment(id)),
            Some(segment) if !segment.is_bud() => return Err(ActionError::NotABud(id)),
            Some(_) => {}
        }
        self.plant.remove_segment(id);
        self.tea_leaves_harvested += 1;
        Ok(self.tea_leaves_harvested)
    }

    /// Replants from seed. Ambient environment data and the lifetime
    /// harvest total survive the reset; the plant itself does not.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.plant = PlantState::new();
        self.last_update = now;
    }
}

impl Default for GameState {
    fn default() -> Self {
        // Epoch, not "now": the default doubles as the merge baseline for
        // partially persisted documents, so it must be deterministic.
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("no segment with id {0}")]
    UnknownSegment(SegmentId),
    #[error("segment {0} is not a bud")]
    NotABud(SegmentId),
}
