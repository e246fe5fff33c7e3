//! Lane groups, signal phases and the phase catalogs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};

/// Directional approach of an intersection arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Single-letter code used in lane-group identifiers.
    pub const fn code(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Movement type permitted on a lane group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Through,
    LeftTurn,
}

impl Movement {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Through => "through",
            Self::LeftTurn => "left-turn",
        }
    }
}

/// One directional approach restricted to one movement type.
///
/// Serialized as the two-character identifier (`"ET"`, `"NL"`, ...), which is
/// also the key format of state snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LaneGroup {
    #[serde(rename = "NT")]
    NorthThrough,
    #[serde(rename = "NL")]
    NorthLeft,
    #[serde(rename = "ST")]
    SouthThrough,
    #[serde(rename = "SL")]
    SouthLeft,
    #[serde(rename = "ET")]
    EastThrough,
    #[serde(rename = "EL")]
    EastLeft,
    #[serde(rename = "WT")]
    WestThrough,
    #[serde(rename = "WL")]
    WestLeft,
}

impl LaneGroup {
    pub const ALL: [Self; 8] = [
        Self::NorthThrough,
        Self::NorthLeft,
        Self::SouthThrough,
        Self::SouthLeft,
        Self::EastThrough,
        Self::EastLeft,
        Self::WestThrough,
        Self::WestLeft,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NorthThrough => "NT",
            Self::NorthLeft => "NL",
            Self::SouthThrough => "ST",
            Self::SouthLeft => "SL",
            Self::EastThrough => "ET",
            Self::EastLeft => "EL",
            Self::WestThrough => "WT",
            Self::WestLeft => "WL",
        }
    }

    pub const fn approach(self) -> Approach {
        match self {
            Self::NorthThrough | Self::NorthLeft => Approach::North,
            Self::SouthThrough | Self::SouthLeft => Approach::South,
            Self::EastThrough | Self::EastLeft => Approach::East,
            Self::WestThrough | Self::WestLeft => Approach::West,
        }
    }

    pub const fn movement(self) -> Movement {
        match self {
            Self::NorthThrough | Self::SouthThrough | Self::EastThrough | Self::WestThrough => {
                Movement::Through
            }
            Self::NorthLeft | Self::SouthLeft | Self::EastLeft | Self::WestLeft => {
                Movement::LeftTurn
            }
        }
    }

    /// Road the vehicles of this lane group leave the intersection on.
    pub const fn outgoing_road(self) -> Approach {
        match self {
            Self::NorthThrough => Approach::South,
            Self::NorthLeft => Approach::East,
            Self::SouthThrough => Approach::North,
            Self::SouthLeft => Approach::West,
            Self::EastThrough => Approach::West,
            Self::EastLeft => Approach::South,
            Self::WestThrough => Approach::East,
            Self::WestLeft => Approach::North,
        }
    }
}

impl fmt::Display for LaneGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaneGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::MalformedState(format!("unknown lane group: {s}")))
    }
}

/// A signal phase: a light configuration releasing exactly two lane groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Etwt,
    Ntst,
    Elwl,
    Nlsl,
    Wtwl,
    Etel,
    Stsl,
    Ntnl,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Etwt => "ETWT",
            Self::Ntst => "NTST",
            Self::Elwl => "ELWL",
            Self::Nlsl => "NLSL",
            Self::Wtwl => "WTWL",
            Self::Etel => "ETEL",
            Self::Stsl => "STSL",
            Self::Ntnl => "NTNL",
        }
    }

    /// The two lane groups the phase name decomposes into, in name order.
    pub const fn lane_groups(self) -> (LaneGroup, LaneGroup) {
        use LaneGroup::{
            EastLeft, EastThrough, NorthLeft, NorthThrough, SouthLeft, SouthThrough, WestLeft,
            WestThrough,
        };
        match self {
            Self::Etwt => (EastThrough, WestThrough),
            Self::Ntst => (NorthThrough, SouthThrough),
            Self::Elwl => (EastLeft, WestLeft),
            Self::Nlsl => (NorthLeft, SouthLeft),
            Self::Wtwl => (WestThrough, WestLeft),
            Self::Etel => (EastThrough, EastLeft),
            Self::Stsl => (SouthThrough, SouthLeft),
            Self::Ntnl => (NorthThrough, NorthLeft),
        }
    }

    /// Name of the phase in the simulator's road-network configuration.
    pub const fn simulator_name(self) -> &'static str {
        match self {
            Self::Etwt => "WT_ET",
            Self::Ntst => "NT_ST",
            Self::Elwl => "WL_EL",
            Self::Nlsl => "NL_SL",
            Self::Wtwl => "WL_WT",
            Self::Etel => "EL_ET",
            Self::Stsl => "SL_ST",
            Self::Ntnl => "NL_NT",
        }
    }

    /// Human description of the lanes released by this phase.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ntst => "Northern and southern through lanes",
            Self::Nlsl => "Northern and southern left-turn lanes",
            Self::Ntnl => "Northern through and left-turn lanes",
            Self::Stsl => "Southern through and left-turn lanes",
            Self::Etwt => "Eastern and western through lanes",
            Self::Elwl => "Eastern and western left-turn lanes",
            Self::Etel => "Eastern through and left-turn lanes",
            Self::Wtwl => "Western through and left-turn lanes",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhaseCatalog::EightPhase
            .phases()
            .iter()
            .copied()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownPhase(s.to_string()))
    }
}

const FOUR_PHASES: [Phase; 4] = [Phase::Etwt, Phase::Ntst, Phase::Elwl, Phase::Nlsl];

const EIGHT_PHASES: [Phase; 8] = [
    Phase::Etwt,
    Phase::Ntst,
    Phase::Elwl,
    Phase::Nlsl,
    Phase::Wtwl,
    Phase::Etel,
    Phase::Stsl,
    Phase::Ntnl,
];

/// The active set of phases, fixed once per agent.
///
/// The action code of a phase is its position in [`PhaseCatalog::phases`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseCatalog {
    #[default]
    FourPhase,
    EightPhase,
}

impl PhaseCatalog {
    pub fn from_phase_count(count: usize) -> DomainResult<Self> {
        match count {
            4 => Ok(Self::FourPhase),
            8 => Ok(Self::EightPhase),
            other => Err(DomainError::UnsupportedPhaseCount(other)),
        }
    }

    /// Phases in enumeration order. This order is the tie-break order of
    /// the decision cascade.
    pub const fn phases(self) -> &'static [Phase] {
        match self {
            Self::FourPhase => &FOUR_PHASES,
            Self::EightPhase => &EIGHT_PHASES,
        }
    }

    pub const fn phase_count(self) -> usize {
        self.phases().len()
    }

    pub fn contains(self, phase: Phase) -> bool {
        self.phases().contains(&phase)
    }

    /// Action code handed to the simulator.
    pub fn encode(self, phase: Phase) -> DomainResult<u32> {
        self.phases()
            .iter()
            .position(|p| *p == phase)
            .and_then(|idx| u32::try_from(idx).ok())
            .ok_or_else(|| DomainError::UnknownPhase(phase.to_string()))
    }

    pub fn decode(self, code: u32) -> DomainResult<Phase> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.phases().get(idx).copied())
            .ok_or_else(|| DomainError::UnknownPhase(format!("code {code}")))
    }

    /// Parse a phase name and check catalog membership.
    pub fn parse_phase(self, name: &str) -> DomainResult<Phase> {
        let phase: Phase = name.parse()?;
        if self.contains(phase) {
            Ok(phase)
        } else {
            Err(DomainError::UnknownPhase(name.to_string()))
        }
    }

    /// Phase names in the simulator's `LANE_LANE` notation, in catalog order.
    pub fn simulator_phase_names(self) -> Vec<&'static str> {
        self.phases().iter().map(|phase| phase.simulator_name()).collect()
    }
}

impl fmt::Display for PhaseCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-phase", self.phase_count())
    }
}
