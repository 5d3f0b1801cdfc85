//! Fixed vocabularies: hull classes, levels, rarities, stat attributes and
//! reference-population policies. All lookup tables here are `const`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HullClass {
    Destroyer,
    LightCruiser,
    HeavyCruiser,
    Battleship,
    AircraftCarrier,
    Submarine,
    Auxiliary,
    SailingFrigate,
}

impl HullClass {
    pub const ALL: [HullClass; 8] = [
        Self::Destroyer,
        Self::LightCruiser,
        Self::HeavyCruiser,
        Self::Battleship,
        Self::AircraftCarrier,
        Self::Submarine,
        Self::Auxiliary,
        Self::SailingFrigate,
    ];

    pub fn shorthand(&self) -> &'static str {
        match self {
            Self::Destroyer => "DD",
            Self::LightCruiser => "CL",
            Self::HeavyCruiser => "CA",
            Self::Battleship => "BB",
            Self::AircraftCarrier => "CV",
            Self::Submarine => "SS",
            Self::Auxiliary => "AUX",
            Self::SailingFrigate => "IX",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Destroyer => "Destroyer",
            Self::LightCruiser => "Light Cruiser",
            Self::HeavyCruiser => "Heavy Cruiser",
            Self::Battleship => "Battleship",
            Self::AircraftCarrier => "Aircraft Carrier",
            Self::Submarine => "Submarine",
            Self::Auxiliary => "Auxiliary",
            Self::SailingFrigate => "Sailing Frigate",
        }
    }
}

impl fmt::Display for HullClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shorthand())
    }
}

impl FromStr for HullClass {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.shorthand().eq_ignore_ascii_case(token))
            .ok_or_else(|| StatsError::InvalidClass(token.to_string()))
    }
}

/// Training level at which a stat snapshot was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Level {
    #[serde(rename = "1")]
    L1,
    #[serde(rename = "100")]
    L100,
    #[serde(rename = "120")]
    L120,
    #[serde(rename = "125")]
    L125,
}

impl Level {
    pub const ALL: [Level; 4] = [Self::L1, Self::L100, Self::L120, Self::L125];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L1 => "1",
            Self::L100 => "100",
            Self::L120 => "120",
            Self::L125 => "125",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = StatsError;

    /// Accepts `100` as well as the file-key form `Level_100`.
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        let digits = token
            .get(..6)
            .filter(|prefix| prefix.eq_ignore_ascii_case("level_"))
            .map_or(token, |_| &token[6..]);
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == digits)
            .ok_or_else(|| StatsError::InvalidLevel(token.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rarity {
    Common,
    Rare,
    Elite,
    SuperRare,
    UltraRare,
    Priority,
    Decisive,
}

impl Rarity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Elite => "Elite",
            Self::SuperRare => "Super Rare",
            Self::UltraRare => "Ultra Rare",
            Self::Priority => "Priority",
            Self::Decisive => "Decisive",
        }
    }

    /// Parse a rarity cell: full label or the usual abbreviation, any case.
    pub fn parse(raw: &str) -> Option<Rarity> {
        match fold_token(raw).as_str() {
            "common" | "normal" | "n" => Some(Self::Common),
            "rare" | "r" => Some(Self::Rare),
            "elite" | "e" => Some(Self::Elite),
            "superrare" | "sr" => Some(Self::SuperRare),
            "ultrarare" | "ur" => Some(Self::UltraRare),
            "priority" | "pr" => Some(Self::Priority),
            "decisive" | "dr" => Some(Self::Decisive),
            _ => None,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the fourteen numeric stat columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Luck,
    Speed,
    Health,
    Firepower,
    AntiAir,
    Torpedo,
    Evasion,
    Aviation,
    OilConsumption,
    Reload,
    AntiSubmarine,
    Oxygen,
    Ammunition,
    Accuracy,
}

/// User tokens and header spellings that name an attribute, already folded
/// with [`fold_token`].
const ATTRIBUTE_ALIASES: &[(&str, Attribute)] = &[
    ("luck", Attribute::Luck),
    ("lck", Attribute::Luck),
    ("speed", Attribute::Speed),
    ("spd", Attribute::Speed),
    ("health", Attribute::Health),
    ("hp", Attribute::Health),
    ("firepower", Attribute::Firepower),
    ("fp", Attribute::Firepower),
    ("antiair", Attribute::AntiAir),
    ("aa", Attribute::AntiAir),
    ("torpedo", Attribute::Torpedo),
    ("trp", Attribute::Torpedo),
    ("evasion", Attribute::Evasion),
    ("eva", Attribute::Evasion),
    ("aviation", Attribute::Aviation),
    ("avi", Attribute::Aviation),
    ("oilconsumption", Attribute::OilConsumption),
    ("oil", Attribute::OilConsumption),
    ("cost", Attribute::OilConsumption),
    ("reload", Attribute::Reload),
    ("rld", Attribute::Reload),
    ("antisubmarine", Attribute::AntiSubmarine),
    ("antisubmarinewarfare", Attribute::AntiSubmarine),
    ("asw", Attribute::AntiSubmarine),
    ("oxygen", Attribute::Oxygen),
    ("oxy", Attribute::Oxygen),
    ("ammunition", Attribute::Ammunition),
    ("ammo", Attribute::Ammunition),
    ("accuracy", Attribute::Accuracy),
    ("hit", Attribute::Accuracy),
    ("acc", Attribute::Accuracy),
];

/// Keyword requesting every numeric attribute.
pub const ALL_ATTRIBUTES_KEYWORD: &str = "all";

pub const ATTRIBUTE_COUNT: usize = 14;

impl Attribute {
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Self::Luck,
        Self::Speed,
        Self::Health,
        Self::Firepower,
        Self::AntiAir,
        Self::Torpedo,
        Self::Evasion,
        Self::Aviation,
        Self::OilConsumption,
        Self::Reload,
        Self::AntiSubmarine,
        Self::Oxygen,
        Self::Ammunition,
        Self::Accuracy,
    ];

    /// Column header as written in the source tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Luck => "Luck",
            Self::Speed => "Speed",
            Self::Health => "Health",
            Self::Firepower => "Firepower",
            Self::AntiAir => "Anti-air",
            Self::Torpedo => "Torpedo",
            Self::Evasion => "Evasion",
            Self::Aviation => "Aviation",
            Self::OilConsumption => "Oil consumption",
            Self::Reload => "Reload",
            Self::AntiSubmarine => "Anti-submarine",
            Self::Oxygen => "Oxygen",
            Self::Ammunition => "Ammunition",
            Self::Accuracy => "Accuracy",
        }
    }

    /// Canonical token a user types to request this attribute.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Luck => "luck",
            Self::Speed => "speed",
            Self::Health => "health",
            Self::Firepower => "firepower",
            Self::AntiAir => "anti-air",
            Self::Torpedo => "torpedo",
            Self::Evasion => "evasion",
            Self::Aviation => "aviation",
            Self::OilConsumption => "oil consumption",
            Self::Reload => "reload",
            Self::AntiSubmarine => "anti-submarine",
            Self::Oxygen => "oxygen",
            Self::Ammunition => "ammunition",
            Self::Accuracy => "accuracy",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Resolve a user token or a column header to an attribute.
    pub fn lookup(raw: &str) -> Option<Attribute> {
        let folded = fold_token(raw);
        ATTRIBUTE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == folded)
            .map(|(_, attribute)| *attribute)
    }

    /// Comma-separated list of canonical tokens, for re-prompts and usage text.
    pub fn vocabulary() -> String {
        let mut tokens: Vec<&str> = Self::ALL.iter().map(Attribute::token).collect();
        tokens.push(ALL_ATTRIBUTES_KEYWORD);
        tokens.join(", ")
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Parse a comma-separated attribute request. `all` expands to every attribute.
///
/// The request is rejected as a whole if any token is unknown. Duplicates are
/// dropped, first occurrence wins.
pub fn parse_attribute_list(input: &str) -> Result<Vec<Attribute>> {
    let tokens: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(StatsError::EmptyAttributeList);
    }

    let mut attributes = Vec::new();
    let mut unknown = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case(ALL_ATTRIBUTES_KEYWORD) {
            attributes.extend(Attribute::ALL);
            continue;
        }
        match Attribute::lookup(token) {
            Some(attribute) => attributes.push(attribute),
            None => unknown.push(token.to_string()),
        }
    }
    if !unknown.is_empty() {
        return Err(StatsError::UnknownAttributes { tokens: unknown });
    }

    let mut seen = [false; ATTRIBUTE_COUNT];
    attributes.retain(|attribute| !std::mem::replace(&mut seen[attribute.index()], true));
    Ok(attributes)
}

/// Reference population a ship's stat is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Every ship of the same hull class at the same level.
    AllInClass,
    /// Ships of the same class and level sharing the target's rarity.
    SameRarity,
    /// Ships of the same class and level at or above the class median.
    AboveMedian,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Self::AllInClass, Self::SameRarity, Self::AboveMedian];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AllInClass => "all ships of the class",
            Self::SameRarity => "ships of the same rarity",
            Self::AboveMedian => "ships at or above the class median",
        }
    }
}

impl FromStr for Policy {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match fold_token(s).as_str() {
            "class" | "all" | "allinclass" => Ok(Self::AllInClass),
            "rarity" | "samerarity" => Ok(Self::SameRarity),
            "abovemedian" | "median" => Ok(Self::AboveMedian),
            _ => Err(StatsError::InvalidPolicy(s.trim().to_string())),
        }
    }
}

/// Lowercase and keep ASCII alphanumerics only: `Anti-air` → `antiair`.
pub fn fold_token(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
