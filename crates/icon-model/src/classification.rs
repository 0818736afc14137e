//! Build-type classification: which of the recognized layouts a
//! screenshot's labels match, driving which icon-set map applies.

use serde::{Deserialize, Serialize};

/// The recognized build/layout types a screenshot can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    PcShipBuild,
    ConsoleShipBuild,
    PcGroundBuild,
    ConsoleGroundBuild,
    PersonalSpaceTraits,
    PersonalGroundTraits,
    StarshipTraits,
    SpaceReputation,
    GroundReputation,
    ActiveSpaceReputation,
    ActiveGroundReputation,
}

impl BuildType {
    pub fn name(&self) -> &'static str {
        match self {
            BuildType::PcShipBuild => "PC Ship Build",
            BuildType::ConsoleShipBuild => "Console Ship Build",
            BuildType::PcGroundBuild => "PC Ground Build",
            BuildType::ConsoleGroundBuild => "Console Ground Build",
            BuildType::PersonalSpaceTraits => "Personal Space Traits",
            BuildType::PersonalGroundTraits => "Personal Ground Traits",
            BuildType::StarshipTraits => "Starship Traits",
            BuildType::SpaceReputation => "Space Reputation",
            BuildType::GroundReputation => "Ground Reputation",
            BuildType::ActiveSpaceReputation => "Active Space Reputation",
            BuildType::ActiveGroundReputation => "Active Ground Reputation",
        }
    }

    /// Whether this build type is one of the always-required trait boxes
    /// that coexist alongside a primary ship/ground build.
    pub fn is_trait_box(&self) -> bool {
        matches!(
            self,
            BuildType::PersonalSpaceTraits
                | BuildType::PersonalGroundTraits
                | BuildType::StarshipTraits
                | BuildType::SpaceReputation
                | BuildType::GroundReputation
                | BuildType::ActiveSpaceReputation
                | BuildType::ActiveGroundReputation
        )
    }
}

/// Which catalog folder map applies for a classified build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconSetKey {
    Ship,
    PcGround,
    ConsoleGround,
    Traits,
}

impl IconSetKey {
    pub fn name(&self) -> &'static str {
        match self {
            IconSetKey::Ship => "ship",
            IconSetKey::PcGround => "pc_ground",
            IconSetKey::ConsoleGround => "console_ground",
            IconSetKey::Traits => "traits",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Pc,
    Console,
}

/// One classification decision: a build type, the classifier's confidence
/// score, whether it is required for a complete report, the icon-set key
/// that selects catalog folders, and the platform it implies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub build_type: BuildType,
    pub score: f64,
    pub is_required: bool,
    pub icon_set_key: IconSetKey,
    pub platform: Platform,
}

/// A run holds exactly one main classification plus zero or more additional
/// required ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSet {
    pub main: Classification,
    pub additional: Vec<Classification>,
}

impl ClassificationSet {
    pub fn new(main: Classification) -> Self {
        Self {
            main,
            additional: Vec::new(),
        }
    }

    /// All classifications (main first), the order `prefilter_icons`
    /// iterates builds in.
    pub fn all(&self) -> impl Iterator<Item = &Classification> {
        std::iter::once(&self.main).chain(self.additional.iter())
    }
}
