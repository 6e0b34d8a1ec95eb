//! Metric catalogue and observation samples.

/// Whether a metric is overwritten or accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Every metric the system emits.
///
/// Label names are fixed per metric and always start with `character`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Level,
    LastRefreshed,
    StatusFlag,
    Stat,
    Resource,
    Experience,
    Gold,
    UnusedPoints,
    ItemCount,
    LocationItemCount,
    SocketedItemCount,
    MaxItemLevel,
    SkillPoints,
    Resolves,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::Level,
        Metric::LastRefreshed,
        Metric::StatusFlag,
        Metric::Stat,
        Metric::Resource,
        Metric::Experience,
        Metric::Gold,
        Metric::UnusedPoints,
        Metric::ItemCount,
        Metric::LocationItemCount,
        Metric::SocketedItemCount,
        Metric::MaxItemLevel,
        Metric::SkillPoints,
        Metric::Resolves,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Level => "armory_character_level",
            Metric::LastRefreshed => "armory_character_last_refreshed_timestamp_seconds",
            Metric::StatusFlag => "armory_character_status_flag",
            Metric::Stat => "armory_character_stat",
            Metric::Resource => "armory_character_resource",
            Metric::Experience => "armory_character_experience",
            Metric::Gold => "armory_character_gold",
            Metric::UnusedPoints => "armory_character_unused_points",
            Metric::ItemCount => "armory_character_item_count",
            Metric::LocationItemCount => "armory_character_location_item_count",
            Metric::SocketedItemCount => "armory_character_socketed_item_count",
            Metric::MaxItemLevel => "armory_character_max_item_level",
            Metric::SkillPoints => "armory_character_skill_points",
            Metric::Resolves => "armory_character_resolves_total",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Metric::Level => "Current level of the character",
            Metric::LastRefreshed => "Unix timestamp of the last successful refresh",
            Metric::StatusFlag => "Header status flags (1 when set)",
            Metric::Stat => "Base attribute values",
            Metric::Resource => "Life, mana and stamina",
            Metric::Experience => "Total experience",
            Metric::Gold => "Gold by location",
            Metric::UnusedPoints => "Unallocated stat and skill points",
            Metric::ItemCount => "Number of items by quality",
            Metric::LocationItemCount => "Number of items by location",
            Metric::SocketedItemCount => "Number of items with at least one socket",
            Metric::MaxItemLevel => "Highest item level by location",
            Metric::SkillPoints => "Allocated skill points by skill tree",
            Metric::Resolves => "Total resolve calls by outcome",
        }
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        match self {
            Metric::Level => &["character", "class", "hardcore"],
            Metric::LastRefreshed | Metric::Experience | Metric::SocketedItemCount => &["character"],
            Metric::StatusFlag => &["character", "flag"],
            Metric::Stat => &["character", "stat"],
            Metric::Resource => &["character", "resource", "bound"],
            Metric::Gold | Metric::LocationItemCount | Metric::MaxItemLevel => &["character", "location"],
            Metric::UnusedPoints => &["character", "kind"],
            Metric::ItemCount => &["character", "quality"],
            Metric::SkillPoints => &["character", "tree"],
            Metric::Resolves => &["character", "status"],
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Resolves => MetricKind::Counter,
            _ => MetricKind::Gauge,
        }
    }
}

/// One labeled gauge sample.
///
/// `labels` are values in the order of [`Metric::label_names`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub metric: Metric,
    pub labels: Vec<String>,
    pub value: f64,
}

impl Observation {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.metric
            .label_names()
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}
