//! Metric family definitions and samples.
//!
//! Families are fixed at compile time. Their names, types and label names
//! are what dashboards and alerts are written against, so they must not
//! change.

/// Prometheus metric type of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic, cumulative value.
    Counter,
    /// Point-in-time value.
    Gauge,
}

impl MetricKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// A named, typed, label-shaped metric definition.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricFamily {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

pub static GAME_TICK: MetricFamily = MetricFamily {
    name: "factorio_game_tick",
    help: "The current tick of the running Factorio game.",
    kind: MetricKind::Counter,
    labels: &[],
};

pub static GAME_PAUSED: MetricFamily = MetricFamily {
    name: "factorio_game_paused",
    help: "The current pause state of the running Factorio game.",
    kind: MetricKind::Gauge,
    labels: &[],
};

pub static PLAYER_CONNECTED: MetricFamily = MetricFamily {
    name: "factorio_player_connected",
    help: "The current connection state of the player.",
    kind: MetricKind::Gauge,
    labels: &["username"],
};

pub static FORCE_RESEARCH_PROGRESS: MetricFamily = MetricFamily {
    name: "factorio_force_research_progress",
    help: "The current research progress percentage (0-1) for a force.",
    kind: MetricKind::Gauge,
    labels: &["force"],
};

pub static FORCE_PROTOTYPE_PRODUCTION: MetricFamily = MetricFamily {
    name: "factorio_force_prototype_production",
    help: "The total production of a given prototype for a force.",
    kind: MetricKind::Counter,
    labels: &["force", "prototype", "surface", "type"],
};

pub static FORCE_PROTOTYPE_CONSUMPTION: MetricFamily = MetricFamily {
    name: "factorio_force_prototype_consumption",
    help: "The total consumption of a given prototype for a force.",
    kind: MetricKind::Counter,
    labels: &["force", "prototype", "surface", "type"],
};

pub static SURFACE_POLLUTION_PRODUCTION: MetricFamily = MetricFamily {
    name: "factorio_surface_pollution_production",
    help: "The pollution produced or consumed from various sources.",
    kind: MetricKind::Gauge,
    labels: &["source", "surface"],
};

pub static SURFACE_POLLUTION_TOTAL: MetricFamily = MetricFamily {
    name: "factorio_surface_pollution_total",
    help: "The total pollution on a given surface.",
    kind: MetricKind::Gauge,
    labels: &["surface"],
};

pub static SURFACE_TICKS_PER_DAY: MetricFamily = MetricFamily {
    name: "factorio_surface_ticks_per_day",
    help: "The number of ticks per day on a given surface.",
    kind: MetricKind::Gauge,
    labels: &["surface"],
};

pub static ENTITY_COUNT: MetricFamily = MetricFamily {
    name: "factorio_entity_count",
    help: "The total number of entities.",
    kind: MetricKind::Gauge,
    labels: &["force", "name", "surface"],
};

pub static ROCKETS_LAUNCHED: MetricFamily = MetricFamily {
    name: "factorio_rockets_launched",
    help: "The total number of rockets launched.",
    kind: MetricKind::Counter,
    labels: &["force"],
};

pub static ITEMS_LAUNCHED: MetricFamily = MetricFamily {
    name: "factorio_items_launched",
    help: "The total number of items launched in rockets.",
    kind: MetricKind::Counter,
    labels: &["force", "name"],
};

/// Every family the exporter can emit.
pub static FAMILIES: [&MetricFamily; 12] = [
    &GAME_TICK,
    &GAME_PAUSED,
    &PLAYER_CONNECTED,
    &FORCE_RESEARCH_PROGRESS,
    &FORCE_PROTOTYPE_PRODUCTION,
    &FORCE_PROTOTYPE_CONSUMPTION,
    &SURFACE_POLLUTION_PRODUCTION,
    &SURFACE_POLLUTION_TOTAL,
    &SURFACE_TICKS_PER_DAY,
    &ENTITY_COUNT,
    &ROCKETS_LAUNCHED,
    &ITEMS_LAUNCHED,
];

/// One concrete value of a family. Label values line up positionally with
/// the family's label names.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub family: &'static MetricFamily,
    pub labels: Vec<String>,
    pub value: f64,
}

impl Sample {
    pub fn new<I, S>(family: &'static MetricFamily, labels: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        debug_assert_eq!(
            labels.len(),
            family.labels.len(),
            "label arity mismatch for {}",
            family.name
        );
        Self {
            family,
            labels,
            value,
        }
    }

    pub fn unlabeled(family: &'static MetricFamily, value: f64) -> Self {
        Self::new(family, Vec::<String>::new(), value)
    }

    /// Identity of the sample within one scrape: family name + label values.
    pub fn key(&self) -> (&'static str, &[String]) {
        (self.family.name, &self.labels)
    }

    /// Value of the label called `name`, if the family has it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.family
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}
