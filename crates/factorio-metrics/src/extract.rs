//! Snapshot-to-sample extraction.
//!
//! Seven independent extractors, each a pure function of one [`Snapshot`].
//! Every extractor is total: a missing subsection yields no samples for that
//! extractor and never affects the others.

use factorio_snapshot::{Field, Snapshot};

use crate::family::*;

/// A pure mapping from one snapshot to the samples of one metric area.
pub type Extractor = fn(&Snapshot) -> Vec<Sample>;

/// The extraction pipeline, in the order it runs each scrape.
pub static PIPELINE: [(&str, Extractor); 7] = [
    ("time", time),
    ("player", players),
    ("force", forces),
    ("pollution", pollution),
    ("surface", surfaces),
    ("entity", entities),
    ("rocket", rockets),
];

/// Entity ownership is not reported by the producer; every entity count is
/// attributed to this force.
pub const ENTITY_FORCE: &str = "player";

/// Run every extractor over `snapshot` and concatenate their output.
pub fn extract(snapshot: &Snapshot) -> Vec<Sample> {
    PIPELINE
        .iter()
        .flat_map(|(_, extractor)| extractor(snapshot))
        .collect()
}

/// The game clock lives under `game.time`; older producers write it at the
/// top level as `time`.
fn game_time(snapshot: &Snapshot) -> Field<'_> {
    let time = snapshot.get(&["game", "time"]);
    if time.is_present() {
        time
    } else {
        snapshot.get(&["time"])
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Game tick counter and pause state.
pub fn time(snapshot: &Snapshot) -> Vec<Sample> {
    let time = game_time(snapshot);
    if !time.is_present() {
        return Vec::new();
    }
    vec![
        Sample::unlabeled(&GAME_TICK, time.get(&["tick"]).number()),
        Sample::unlabeled(&GAME_PAUSED, flag(time.get(&["paused"]).bool())),
    ]
}

/// Connection state per player.
pub fn players(snapshot: &Snapshot) -> Vec<Sample> {
    snapshot
        .get(&["players"])
        .entries()
        .map(|(username, player)| {
            Sample::new(
                &PLAYER_CONNECTED,
                [username],
                flag(player.get(&["connected"]).bool()),
            )
        })
        .collect()
}

/// The two production-statistics sections of a force.
const PROTOTYPE_SECTIONS: [&str; 2] = ["items", "fluids"];

/// Research progress per force, plus production and consumption per
/// prototype per surface. Figures at or below zero are dropped so unused
/// prototypes do not turn into label sets.
pub fn forces(snapshot: &Snapshot) -> Vec<Sample> {
    let mut out = Vec::new();
    for (force_name, force) in snapshot.get(&["forces"]).entries() {
        out.push(Sample::new(
            &FORCE_RESEARCH_PROGRESS,
            [force_name],
            force.get(&["research", "progress"]).number(),
        ));

        for section in PROTOTYPE_SECTIONS {
            for (surface_name, surface) in force.get(&[section]).entries() {
                for (prototype, stats) in surface.entries() {
                    let labels = [force_name, prototype, surface_name, section];
                    let production = stats.get(&["production"]).number();
                    if production > 0.0 {
                        out.push(Sample::new(&FORCE_PROTOTYPE_PRODUCTION, labels, production));
                    }
                    let consumption = stats.get(&["consumption"]).number();
                    if consumption > 0.0 {
                        out.push(Sample::new(&FORCE_PROTOTYPE_CONSUMPTION, labels, consumption));
                    }
                }
            }
        }
    }
    out
}

/// Pollution per (source, surface).
pub fn pollution(snapshot: &Snapshot) -> Vec<Sample> {
    let mut out = Vec::new();
    for (surface_name, sources) in snapshot.get(&["pollution"]).entries() {
        for (source, amount) in sources.entries() {
            out.push(Sample::new(
                &SURFACE_POLLUTION_PRODUCTION,
                [source, surface_name],
                amount.number(),
            ));
        }
    }
    out
}

/// Total pollution and day length per surface.
pub fn surfaces(snapshot: &Snapshot) -> Vec<Sample> {
    let mut out = Vec::new();
    for (surface_name, surface) in snapshot.get(&["surfaces"]).entries() {
        out.push(Sample::new(
            &SURFACE_POLLUTION_TOTAL,
            [surface_name],
            surface.get(&["pollution"]).number(),
        ));
        out.push(Sample::new(
            &SURFACE_TICKS_PER_DAY,
            [surface_name],
            surface.get(&["ticks_per_day"]).number(),
        ));
    }
    out
}

/// Entity counts per (entity type, surface), all under [`ENTITY_FORCE`].
pub fn entities(snapshot: &Snapshot) -> Vec<Sample> {
    let mut out = Vec::new();
    for (surface_name, surface) in snapshot.get(&["surfaces"]).entries() {
        for (entity_name, count) in surface.get(&["entities"]).entries() {
            out.push(Sample::new(
                &ENTITY_COUNT,
                [ENTITY_FORCE, entity_name, surface_name],
                count.number(),
            ));
        }
    }
    out
}

/// Rocket launches per force and launched items per (force, item).
/// The producer reports whole counts; fractional parts are truncated.
pub fn rockets(snapshot: &Snapshot) -> Vec<Sample> {
    let mut out = Vec::new();
    for (force_name, force) in snapshot.get(&["forces"]).entries() {
        let rockets = force.get(&["rockets"]);
        out.push(Sample::new(
            &ROCKETS_LAUNCHED,
            [force_name],
            rockets.get(&["launches"]).int() as f64,
        ));
        for (item_name, count) in rockets.get(&["items"]).entries() {
            out.push(Sample::new(
                &ITEMS_LAUNCHED,
                [force_name, item_name],
                count.int() as f64,
            ));
        }
    }
    out
}
