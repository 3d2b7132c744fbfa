//! Named starting points for the scenario controls

use std::fmt;
use std::str::FromStr;

use crate::error::ScenarioError;
use crate::models::ScenarioInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioPreset {
    #[default]
    Custom,
    GreenCity,
    RapidGrowth,
    DroughtRegion,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 4] = [
        ScenarioPreset::Custom,
        ScenarioPreset::GreenCity,
        ScenarioPreset::RapidGrowth,
        ScenarioPreset::DroughtRegion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioPreset::Custom => "Custom",
            ScenarioPreset::GreenCity => "Green City",
            ScenarioPreset::RapidGrowth => "Rapid Growth",
            ScenarioPreset::DroughtRegion => "Drought Region",
        }
    }

    pub fn inputs(self) -> ScenarioInputs {
        match self {
            ScenarioPreset::Custom => ScenarioInputs::default(),
            ScenarioPreset::GreenCity => ScenarioInputs {
                funding: 40.0,
                regulation: 8.0,
                reactors: 50.0,
                green_pct: 80.0,
                water_pct: 20.0,
                pop_growth: 0.5,
                mix: None,
            },
            ScenarioPreset::RapidGrowth => ScenarioInputs {
                funding: 80.0,
                regulation: 4.0,
                reactors: 150.0,
                green_pct: 30.0,
                water_pct: 40.0,
                pop_growth: 3.0,
                mix: None,
            },
            ScenarioPreset::DroughtRegion => ScenarioInputs {
                funding: 60.0,
                regulation: 6.0,
                reactors: 80.0,
                green_pct: 40.0,
                water_pct: 70.0,
                pop_growth: 1.2,
                mix: None,
            },
        }
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Accepts "Green City", "green-city", "green_city" or "greencity"
impl FromStr for ScenarioPreset {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        ScenarioPreset::ALL
            .into_iter()
            .find(|preset| preset.name().replace(' ', "").eq_ignore_ascii_case(&key))
            .ok_or_else(|| ScenarioError::UnknownPreset(s.to_string()))
    }
}
