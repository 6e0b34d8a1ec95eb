//! Structured character snapshot produced by a parser.
//!
//! The layout mirrors what a save-file parser hands back: a header, the
//! attribute block, allocated skills and one item collection per place an
//! item can live. Every section except the header is optional on the wire
//! and decodes to its empty value when missing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Header status bit set for hardcore characters.
pub const STATUS_HARDCORE: u8 = 0x04;
/// Header status bit set once a character has died.
pub const STATUS_DIED: u8 = 0x08;
/// Header status bit set for expansion characters.
pub const STATUS_EXPANSION: u8 = 0x20;
/// Header status bit set for ladder characters.
pub const STATUS_LADDER: u8 = 0x40;

/// Raw item quality ids as stored in save files.
pub mod quality {
    pub const LOW: u8 = 1;
    pub const NORMAL: u8 = 2;
    pub const SUPERIOR: u8 = 3;
    pub const MAGIC: u8 = 4;
    pub const SET: u8 = 5;
    pub const RARE: u8 = 6;
    pub const UNIQUE: u8 = 7;
    pub const CRAFTED: u8 = 8;
}

/// A parsed character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CharacterSnapshot {
    pub header: Header,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub equipped: Vec<Item>,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub corpse: Vec<Item>,
    #[serde(default)]
    pub merc: Vec<Item>,
    /// Shared stash contents. `None` when the parser does not expose a stash.
    #[serde(default)]
    pub stash: Option<Vec<Item>>,
}

/// Item collections of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Equipped,
    Inventory,
    Corpse,
    Merc,
    Stash,
}

impl Location {
    pub const ALL: [Location; 5] =
        [Location::Equipped, Location::Inventory, Location::Corpse, Location::Merc, Location::Stash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Equipped => "equipped",
            Location::Inventory => "inventory",
            Location::Corpse => "corpse",
            Location::Merc => "merc",
            Location::Stash => "stash",
        }
    }
}

impl CharacterSnapshot {
    /// Items enumerated from one collection, or `None` if the snapshot does
    /// not expose that collection at all.
    pub fn items(&self, location: Location) -> Option<&[Item]> {
        match location {
            Location::Equipped => Some(&self.equipped),
            Location::Inventory => Some(&self.inventory),
            Location::Corpse => Some(&self.corpse),
            Location::Merc => Some(&self.merc),
            Location::Stash => self.stash.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Header {
    pub name: String,
    pub class: String,
    pub level: u8,
    /// Status bitmask, see the `STATUS_*` constants.
    #[serde(default)]
    pub status: u8,
}

impl Header {
    pub fn is_hardcore(&self) -> bool {
        self.status & STATUS_HARDCORE != 0
    }

    pub fn has_died(&self) -> bool {
        self.status & STATUS_DIED != 0
    }

    pub fn is_expansion(&self) -> bool {
        self.status & STATUS_EXPANSION != 0
    }

    pub fn is_ladder(&self) -> bool {
        self.status & STATUS_LADDER != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Attributes {
    pub strength: u32,
    pub energy: u32,
    pub dexterity: u32,
    pub vitality: u32,
    pub unused_stats: u32,
    pub unused_skill_points: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_mana: u32,
    pub max_mana: u32,
    pub current_stamina: u32,
    pub max_stamina: u32,
    pub experience: u64,
    pub gold: u32,
    pub stashed_gold: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Skill {
    pub id: u16,
    pub points: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Item {
    /// Item type code, e.g. `rin` or `amu`.
    pub code: String,
    pub level: u8,
    /// Raw quality id, see [`quality`]. Zero when unknown.
    pub quality: u8,
    /// Number of sockets on the item.
    pub sockets: u8,
    pub unique_id: Option<u16>,
    pub set_id: Option<u16>,
    pub rare_name_id: Option<u8>,
    pub magic_prefix: Option<u16>,
    pub magic_suffix: Option<u16>,
    pub runeword_id: Option<u16>,
    pub given_runeword: bool,
}
