//! Snapshot to observation projection.
//!
//! [`MetricsProjector::project`] turns one record into a flat batch of gauge
//! observations. The projection is a pure function of the record: the same
//! record always yields the same batch, in the same order, and every
//! optional section of the snapshot degrades to zero rather than vanishing.
//!
//! ### Item classification
//! - Quality buckets are tested in strict precedence
//!   (unique, set, rare, magic, runeword, normal); each item lands in exactly one.
//! - Location is the collection an item was enumerated from.
//! - Max item level per location starts at zero, so empty locations report zero.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::observation::{Metric, Observation};
use crate::record::Record;
use crate::snapshot::{Item, Location, quality};

/// Item quality buckets, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityBucket {
    Unique = 0,
    Set = 1,
    Rare = 2,
    Magic = 3,
    Runeword = 4,
    Normal = 5,
}

impl QualityBucket {
    pub const ALL: [QualityBucket; 6] = [
        QualityBucket::Unique,
        QualityBucket::Set,
        QualityBucket::Rare,
        QualityBucket::Magic,
        QualityBucket::Runeword,
        QualityBucket::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBucket::Unique => "unique",
            QualityBucket::Set => "set",
            QualityBucket::Rare => "rare",
            QualityBucket::Magic => "magic",
            QualityBucket::Runeword => "runeword",
            QualityBucket::Normal => "normal",
        }
    }
}

/// Skill tree label used when no class table knows a skill.
pub const UNKNOWN_TREE: &str = "unknown";

/// Class-aware lookups the projector cannot derive from a snapshot alone.
///
/// The defaults know nothing: every skill maps to [`UNKNOWN_TREE`] and only
/// items the parser already marked as runewords are detected as such.
pub trait ClassTables: Send + Sync {
    /// Skill tree of `skill_id` for `class`, if known.
    fn skill_tree(&self, _class: &str, _skill_id: u16) -> Option<&'static str> {
        None
    }

    fn is_runeword(&self, item: &Item) -> bool {
        item.given_runeword || item.runeword_id.is_some()
    }
}

/// [`ClassTables`] with no class knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTables;

impl ClassTables for DefaultTables {}

/// Derives observations from records.
#[derive(Clone)]
pub struct MetricsProjector {
    tables: Arc<dyn ClassTables>,
}

impl Default for MetricsProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProjector {
    pub fn new() -> Self {
        Self { tables: Arc::new(DefaultTables) }
    }

    pub fn with_tables(tables: Arc<dyn ClassTables>) -> Self {
        Self { tables }
    }

    /// Quality bucket of a single item.
    pub fn classify(&self, item: &Item) -> QualityBucket {
        if item.quality == quality::UNIQUE || item.unique_id.is_some() {
            QualityBucket::Unique
        } else if item.quality == quality::SET || item.set_id.is_some() {
            QualityBucket::Set
        } else if matches!(item.quality, quality::RARE | quality::CRAFTED) || item.rare_name_id.is_some() {
            QualityBucket::Rare
        } else if item.quality == quality::MAGIC || item.magic_prefix.is_some() || item.magic_suffix.is_some() {
            QualityBucket::Magic
        } else if self.tables.is_runeword(item) {
            QualityBucket::Runeword
        } else {
            QualityBucket::Normal
        }
    }

    /// Project a record into its full observation batch.
    pub fn project(&self, record: &Record) -> Vec<Observation> {
        let mut batch = Batch::new(&record.id);
        let snapshot = &record.snapshot;
        let header = &snapshot.header;
        let attrs = &snapshot.attributes;

        let hardcore = if header.is_hardcore() { "true" } else { "false" };
        batch.gauge(Metric::Level, &[header.class.as_str(), hardcore], f64::from(header.level));
        batch.gauge(Metric::LastRefreshed, &[], record.last_refreshed_at.timestamp() as f64);

        for (flag, set) in [
            ("hardcore", header.is_hardcore()),
            ("died", header.has_died()),
            ("expansion", header.is_expansion()),
            ("ladder", header.is_ladder()),
        ] {
            batch.gauge(Metric::StatusFlag, &[flag], if set { 1.0 } else { 0.0 });
        }

        for (stat, value) in [
            ("strength", attrs.strength),
            ("dexterity", attrs.dexterity),
            ("vitality", attrs.vitality),
            ("energy", attrs.energy),
        ] {
            batch.gauge(Metric::Stat, &[stat], f64::from(value));
        }

        for (resource, current, max) in [
            ("life", attrs.current_hp, attrs.max_hp),
            ("mana", attrs.current_mana, attrs.max_mana),
            ("stamina", attrs.current_stamina, attrs.max_stamina),
        ] {
            batch.gauge(Metric::Resource, &[resource, "current"], f64::from(current));
            batch.gauge(Metric::Resource, &[resource, "max"], f64::from(max));
        }

        batch.gauge(Metric::Experience, &[], attrs.experience as f64);
        batch.gauge(Metric::Gold, &[Location::Inventory.as_str()], f64::from(attrs.gold));
        batch.gauge(Metric::Gold, &[Location::Stash.as_str()], f64::from(attrs.stashed_gold));
        batch.gauge(Metric::UnusedPoints, &["stat"], f64::from(attrs.unused_stats));
        batch.gauge(Metric::UnusedPoints, &["skill"], f64::from(attrs.unused_skill_points));

        let mut by_quality = [0u64; QualityBucket::ALL.len()];
        let mut socketed = 0u64;
        for location in Location::ALL {
            let Some(items) = snapshot.items(location) else {
                continue;
            };

            let mut max_level = 0u8;
            for item in items {
                by_quality[self.classify(item) as usize] += 1;
                if item.sockets > 0 {
                    socketed += 1;
                }
                max_level = max_level.max(item.level);
            }

            batch.gauge(Metric::LocationItemCount, &[location.as_str()], items.len() as f64);
            batch.gauge(Metric::MaxItemLevel, &[location.as_str()], f64::from(max_level));
        }

        for bucket in QualityBucket::ALL {
            batch.gauge(Metric::ItemCount, &[bucket.as_str()], by_quality[bucket as usize] as f64);
        }
        batch.gauge(Metric::SocketedItemCount, &[], socketed as f64);

        let mut trees: BTreeMap<&str, u64> = BTreeMap::new();
        for skill in &snapshot.skills {
            let tree = self.tables.skill_tree(&header.class, skill.id).unwrap_or(UNKNOWN_TREE);
            *trees.entry(tree).or_default() += u64::from(skill.points);
        }
        for (tree, points) in trees {
            batch.gauge(Metric::SkillPoints, &[tree], points as f64);
        }

        batch.observations
    }
}

/// Accumulates observations that all share one `character` label.
struct Batch<'a> {
    id: &'a str,
    observations: Vec<Observation>,
}

impl<'a> Batch<'a> {
    fn new(id: &'a str) -> Self {
        Self { id, observations: Vec::with_capacity(48) }
    }

    fn gauge(&mut self, metric: Metric, labels: &[&str], value: f64) {
        debug_assert_eq!(labels.len() + 1, metric.label_names().len(), "{metric:?}");
        let mut values = Vec::with_capacity(labels.len() + 1);
        values.push(self.id.to_string());
        values.extend(labels.iter().map(|l| l.to_string()));
        self.observations.push(Observation { metric, labels: values, value });
    }
}
