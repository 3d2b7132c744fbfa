//! Data models for scenarios, energy mixes, flows and survey responses

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::error::{ScenarioError, ScenarioResult};

/// Inclusive slider bounds for each scenario input
pub const FUNDING_RANGE: (f64, f64) = (0.0, 100.0);
pub const REGULATION_RANGE: (f64, f64) = (0.0, 10.0);
pub const REACTORS_RANGE: (f64, f64) = (0.0, 200.0);
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);
pub const POP_GROWTH_RANGE: (f64, f64) = (0.0, 5.0);

/// One set of scenario controls. A fresh value is built for every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioInputs {
    pub funding: f64,     // Government R&D funding, $B
    pub regulation: f64,  // Oversight strictness, 0-10
    pub reactors: f64,
    pub green_pct: f64,   // Green energy investment, %
    pub water_pct: f64,   // Water withdrawal, %
    pub pop_growth: f64,  // Population growth rate, %/year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix: Option<EnergyMix>,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            funding: 50.0,
            regulation: 5.0,
            reactors: 100.0,
            green_pct: 20.0,
            water_pct: 30.0,
            pop_growth: 1.0,
            mix: None,
        }
    }
}

impl ScenarioInputs {
    fn bounded_fields(&self) -> [(&'static str, f64, (f64, f64)); 6] {
        [
            ("funding", self.funding, FUNDING_RANGE),
            ("regulation", self.regulation, REGULATION_RANGE),
            ("reactors", self.reactors, REACTORS_RANGE),
            ("green_pct", self.green_pct, PERCENT_RANGE),
            ("water_pct", self.water_pct, PERCENT_RANGE),
            ("pop_growth", self.pop_growth, POP_GROWTH_RANGE),
        ]
    }

    /// Reject any field outside its slider range (NaN included)
    pub fn validate(&self) -> ScenarioResult<()> {
        for (field, value, (min, max)) in self.bounded_fields() {
            if !(min..=max).contains(&value) {
                return Err(ScenarioError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Pull every field back into its slider range
    pub fn clamped(&self) -> Self {
        Self {
            funding: clamp_field(self.funding, FUNDING_RANGE),
            regulation: clamp_field(self.regulation, REGULATION_RANGE),
            reactors: clamp_field(self.reactors, REACTORS_RANGE),
            green_pct: clamp_field(self.green_pct, PERCENT_RANGE),
            water_pct: clamp_field(self.water_pct, PERCENT_RANGE),
            pop_growth: clamp_field(self.pop_growth, POP_GROWTH_RANGE),
            mix: self.mix.clone(),
        }
    }

    /// Names of the fields that `clamped` would change
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        self.bounded_fields()
            .into_iter()
            .filter(|(_, value, (min, max))| !(*min..=*max).contains(value))
            .map(|(field, _, _)| field)
            .collect()
    }

    /// Replace only the fields that were given, keeping the rest
    pub fn with_overrides(self, overrides: InputOverrides) -> Self {
        Self {
            funding: overrides.funding.unwrap_or(self.funding),
            regulation: overrides.regulation.unwrap_or(self.regulation),
            reactors: overrides.reactors.unwrap_or(self.reactors),
            green_pct: overrides.green_pct.unwrap_or(self.green_pct),
            water_pct: overrides.water_pct.unwrap_or(self.water_pct),
            pop_growth: overrides.pop_growth.unwrap_or(self.pop_growth),
            mix: overrides.mix.or(self.mix),
        }
    }

    /// Clamp when `clamp` is set, otherwise reject anything out of range
    pub fn bounded(self, clamp: bool) -> ScenarioResult<Self> {
        if clamp {
            for field in self.out_of_range_fields() {
                warn!(field, "clamping out-of-range input");
            }
            Ok(self.clamped())
        } else {
            self.validate()?;
            Ok(self)
        }
    }
}

/// Individual control values layered over a preset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOverrides {
    pub funding: Option<f64>,
    pub regulation: Option<f64>,
    pub reactors: Option<f64>,
    pub green_pct: Option<f64>,
    pub water_pct: Option<f64>,
    pub pop_growth: Option<f64>,
    pub mix: Option<EnergyMix>,
}

fn clamp_field(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnergySource {
    Nuclear,
    Solar,
    Wind,
    Hydro,
}

impl EnergySource {
    pub const ALL: [EnergySource; 4] = [
        EnergySource::Nuclear,
        EnergySource::Solar,
        EnergySource::Wind,
        EnergySource::Hydro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnergySource::Nuclear => "Nuclear",
            EnergySource::Solar => "Solar",
            EnergySource::Wind => "Wind",
            EnergySource::Hydro => "Hydro",
        }
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Percentage split of generation across the four sources.
///
/// Hydro is never given directly: it is whatever is left of 100% after
/// nuclear, solar and wind, so the four weights always sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyMix {
    nuclear: f64,
    solar: f64,
    wind: f64,
    hydro: f64,
}

impl EnergyMix {
    pub fn new(nuclear: f64, solar: f64, wind: f64) -> ScenarioResult<Self> {
        for (name, value) in [("nuclear", nuclear), ("solar", solar), ("wind", wind)] {
            if !(PERCENT_RANGE.0..=PERCENT_RANGE.1).contains(&value) {
                return Err(ScenarioError::InvalidMix(format!(
                    "{} = {} must be between 0 and 100",
                    name, value
                )));
            }
        }

        let given = nuclear + solar + wind;
        if given > 100.0 + 1e-9 {
            return Err(ScenarioError::InvalidMix(format!(
                "nuclear + solar + wind = {} exceeds 100",
                given
            )));
        }

        Ok(Self {
            nuclear,
            solar,
            wind,
            hydro: (100.0 - given).max(0.0),
        })
    }

    pub fn weight(&self, source: EnergySource) -> f64 {
        match source {
            EnergySource::Nuclear => self.nuclear,
            EnergySource::Solar => self.solar,
            EnergySource::Wind => self.wind,
            EnergySource::Hydro => self.hydro,
        }
    }

    pub fn weights(&self) -> [(EnergySource, f64); 4] {
        EnergySource::ALL.map(|source| (source, self.weight(source)))
    }
}

impl Default for EnergyMix {
    fn default() -> Self {
        Self {
            nuclear: 25.0,
            solar: 25.0,
            wind: 25.0,
            hydro: 25.0,
        }
    }
}

/// Parses `nuclear=40,solar=20,wind=25` (case-insensitive, `:` also accepted).
/// Missing sources default to 0; hydro takes the remainder.
impl FromStr for EnergyMix {
    type Err = ScenarioError;

    fn from_str(s: &str) -> ScenarioResult<Self> {
        let pair_re = Regex::new(r"(?i)([a-z]+)\s*[=:]\s*([0-9]+(?:\.[0-9]+)?)")
            .map_err(|e| ScenarioError::InvalidMix(e.to_string()))?;

        let leftover = pair_re.replace_all(s, "");
        if !leftover.chars().all(|c| c == ',' || c.is_whitespace()) {
            return Err(ScenarioError::InvalidMix(format!(
                "could not parse '{}'",
                leftover.trim()
            )));
        }

        let mut nuclear = None;
        let mut solar = None;
        let mut wind = None;
        let mut matched = 0;
        for cap in pair_re.captures_iter(s) {
            matched += 1;
            let value: f64 = cap[2]
                .parse()
                .map_err(|_| ScenarioError::InvalidMix(format!("bad number '{}'", &cap[2])))?;
            let slot = match cap[1].to_ascii_lowercase().as_str() {
                "nuclear" => &mut nuclear,
                "solar" => &mut solar,
                "wind" => &mut wind,
                "hydro" => {
                    return Err(ScenarioError::InvalidMix(
                        "hydro is derived as the remainder and cannot be set".to_string(),
                    ));
                }
                other => {
                    return Err(ScenarioError::InvalidMix(format!("unknown source '{}'", other)));
                }
            };
            if slot.replace(value).is_some() {
                return Err(ScenarioError::InvalidMix(format!(
                    "{} given more than once",
                    &cap[1]
                )));
            }
        }

        if matched == 0 {
            return Err(ScenarioError::InvalidMix("no sources given".to_string()));
        }

        EnergyMix::new(
            nuclear.unwrap_or(0.0),
            solar.unwrap_or(0.0),
            wind.unwrap_or(0.0),
        )
    }
}

/// Mix-weighted reference figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MixMetrics {
    pub weighted_capacity_factor: f64, // %
    pub weighted_co2_intensity: f64,   // g CO2-eq/kWh
}

/// Everything derived from one `ScenarioInputs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutputs {
    pub co2_avoided: f64,        // Mt
    pub risk_index: f64,
    pub energy_output: f64,      // TWh
    pub projected_demand: f64,   // TWh at the end of the horizon
    pub biodiversity_impact: f64, // %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix_metrics: Option<MixMetrics>,
}

/// Nodes of the energy flow diagram, in fixed index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowNode {
    Demand,
    Nuclear,
    Solar,
    Wind,
    Hydro,
    Surplus,
    Shortfall,
}

impl FlowNode {
    pub const ALL: [FlowNode; 7] = [
        FlowNode::Demand,
        FlowNode::Nuclear,
        FlowNode::Solar,
        FlowNode::Wind,
        FlowNode::Hydro,
        FlowNode::Surplus,
        FlowNode::Shortfall,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Node labels indexed the same way as `index`
    pub fn labels() -> [&'static str; 7] {
        FlowNode::ALL.map(FlowNode::label)
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowNode::Demand => "Demand",
            FlowNode::Nuclear => "Nuclear",
            FlowNode::Solar => "Solar",
            FlowNode::Wind => "Wind",
            FlowNode::Hydro => "Hydro",
            FlowNode::Surplus => "Surplus",
            FlowNode::Shortfall => "Shortfall",
        }
    }
}

impl From<EnergySource> for FlowNode {
    fn from(source: EnergySource) -> Self {
        match source {
            EnergySource::Nuclear => FlowNode::Nuclear,
            EnergySource::Solar => FlowNode::Solar,
            EnergySource::Wind => FlowNode::Wind,
            EnergySource::Hydro => FlowNode::Hydro,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowLink {
    #[serde(serialize_with = "serialize_node_index")]
    pub source: FlowNode,
    #[serde(serialize_with = "serialize_node_index")]
    pub target: FlowNode,
    pub value: f64,
}

/// Links carry node indices so the JSON pairs directly with `EnergyFlow::nodes`
fn serialize_node_index<S: Serializer>(node: &FlowNode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(node.index() as u64)
}

/// Outcome of reconciling supply against demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum FlowBalance {
    Surplus(f64),
    Shortfall(f64),
}

impl FlowBalance {
    pub fn link(self) -> FlowLink {
        match self {
            FlowBalance::Surplus(value) => FlowLink {
                source: FlowNode::Demand,
                target: FlowNode::Surplus,
                value,
            },
            FlowBalance::Shortfall(value) => FlowLink {
                source: FlowNode::Shortfall,
                target: FlowNode::Demand,
                value,
            },
        }
    }
}

/// Sankey-style breakdown of supply into demand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyFlow {
    pub nodes: [&'static str; 7],
    pub links: Vec<FlowLink>,
    pub supplied: f64,
    pub demand: f64,
    pub balance: FlowBalance,
}

/// Declares a survey answer enum with its display labels and lenient parsing
macro_rules! survey_answer {
    (
        $name:ident,
        $question:literal,
        { $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ScenarioError;

            fn from_str(s: &str) -> ScenarioResult<Self> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($label)
                        $(|| wanted.eq_ignore_ascii_case($alias))*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(ScenarioError::UnknownAnswer {
                    question: $question,
                    answer: s.to_string(),
                })
            }
        }
    };
}

survey_answer!(AgeGroup, "age", {
    From18To29 => "18–29" | "18-29",
    From30To49 => "30–49" | "30-49",
    Over50 => "50+",
});

survey_answer!(Support, "support", {
    Yes => "Yes",
    No => "No",
    Unsure => "Unsure",
});

survey_answer!(OpinionChange, "change", {
    MoreFavorable => "More Favorable" | "more-favorable",
    NoChange => "No Change" | "no-change",
    MoreSkeptical => "More Skeptical" | "more-skeptical",
});

/// One row of the post-simulation survey
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponse {
    pub age_group: AgeGroup,
    pub support: Support,
    pub change: OpinionChange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::ScenarioPreset;

    #[test]
    fn defaults_are_within_range() {
        assert!(ScenarioInputs::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_and_nan() {
        let too_many = ScenarioInputs {
            reactors: 250.0,
            ..ScenarioInputs::default()
        };
        assert_eq!(
            too_many.validate(),
            Err(ScenarioError::OutOfRange {
                field: "reactors",
                value: 250.0,
                min: 0.0,
                max: 200.0,
            })
        );

        let nan_growth = ScenarioInputs {
            pop_growth: f64::NAN,
            ..ScenarioInputs::default()
        };
        assert!(nan_growth.validate().is_err());
    }

    #[test]
    fn clamped_pulls_fields_into_range() {
        let wild = ScenarioInputs {
            funding: -5.0,
            regulation: 12.0,
            pop_growth: f64::NAN,
            ..ScenarioInputs::default()
        };
        assert_eq!(
            wild.out_of_range_fields(),
            vec!["funding", "regulation", "pop_growth"]
        );

        let fixed = wild.clamped();
        assert_eq!(fixed.funding, 0.0);
        assert_eq!(fixed.regulation, 10.0);
        assert_eq!(fixed.pop_growth, 0.0);
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let preset = ScenarioPreset::DroughtRegion.inputs();
        let inputs = preset.clone().with_overrides(InputOverrides {
            reactors: Some(120.0),
            water_pct: Some(10.0),
            ..InputOverrides::default()
        });

        assert_eq!(inputs.reactors, 120.0);
        assert_eq!(inputs.water_pct, 10.0);
        assert_eq!(inputs.funding, preset.funding);
        assert_eq!(inputs.regulation, preset.regulation);
        assert_eq!(inputs.green_pct, preset.green_pct);
        assert_eq!(inputs.pop_growth, preset.pop_growth);
        assert_eq!(inputs.mix, None);
    }

    #[test]
    fn empty_overrides_keep_preset() {
        let preset = ScenarioPreset::GreenCity.inputs();
        assert_eq!(preset.clone().with_overrides(InputOverrides::default()), preset);
    }

    #[test]
    fn override_sets_mix() {
        let mix = EnergyMix::new(50.0, 10.0, 10.0).unwrap();
        let inputs = ScenarioInputs::default().with_overrides(InputOverrides {
            mix: Some(mix.clone()),
            ..InputOverrides::default()
        });
        assert_eq!(inputs.mix, Some(mix));
    }

    #[test]
    fn bounded_rejects_or_clamps() {
        let wild = ScenarioInputs::default().with_overrides(InputOverrides {
            water_pct: Some(130.0),
            ..InputOverrides::default()
        });

        assert!(matches!(
            wild.clone().bounded(false),
            Err(ScenarioError::OutOfRange { field: "water_pct", .. })
        ));

        let clamped = wild.bounded(true).unwrap();
        assert_eq!(clamped.water_pct, 100.0);
        assert_eq!(clamped.funding, 50.0);

        let fine = ScenarioInputs::default();
        assert_eq!(fine.clone().bounded(false).unwrap(), fine);
    }

    #[test]
    fn mix_derives_hydro_as_remainder() {
        let mix = EnergyMix::new(40.0, 20.0, 25.0).unwrap();
        assert_eq!(mix.weight(EnergySource::Hydro), 15.0);
        let total: f64 = mix.weights().iter().map(|(_, w)| w).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn mix_rejects_overflow() {
        assert!(matches!(
            EnergyMix::new(60.0, 30.0, 20.0),
            Err(ScenarioError::InvalidMix(_))
        ));
        assert!(EnergyMix::new(-1.0, 30.0, 20.0).is_err());
    }

    #[test]
    fn mix_parses_text() {
        let mix: EnergyMix = "Nuclear=40, solar:20 wind=25".parse().unwrap();
        assert_eq!(mix, EnergyMix::new(40.0, 20.0, 25.0).unwrap());

        let partial: EnergyMix = "wind=100".parse().unwrap();
        assert_eq!(partial.weight(EnergySource::Nuclear), 0.0);
        assert_eq!(partial.weight(EnergySource::Hydro), 0.0);
    }

    #[test]
    fn mix_parse_errors() {
        assert!("hydro=10".parse::<EnergyMix>().is_err());
        assert!("coal=10".parse::<EnergyMix>().is_err());
        assert!("nuclear=10,nuclear=20".parse::<EnergyMix>().is_err());
        assert!("nuclear=ten".parse::<EnergyMix>().is_err());
    }

    #[test]
    fn blank_mix_is_rejected() {
        for text in ["", " , ", "   "] {
            assert_eq!(
                text.parse::<EnergyMix>(),
                Err(ScenarioError::InvalidMix("no sources given".to_string()))
            );
        }
    }

    #[test]
    fn flow_node_indices_follow_label_order() {
        let labels: Vec<_> = FlowNode::ALL.iter().map(|n| n.label()).collect();
        assert_eq!(
            labels,
            ["Demand", "Nuclear", "Solar", "Wind", "Hydro", "Surplus", "Shortfall"]
        );
        assert_eq!(FlowNode::labels().to_vec(), labels);
        assert_eq!(FlowNode::Shortfall.index(), 6);
        assert_eq!(FlowNode::from(EnergySource::Wind), FlowNode::Wind);
    }

    #[test]
    fn flow_link_serializes_node_indices() {
        let link = FlowBalance::Shortfall(100.0).link();
        let json = serde_json::to_value(link).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "source": 6, "target": 0, "value": 100.0 })
        );
    }

    #[test]
    fn survey_answers_parse_leniently() {
        assert_eq!("18-29".parse::<AgeGroup>().unwrap(), AgeGroup::From18To29);
        assert_eq!("50+".parse::<AgeGroup>().unwrap(), AgeGroup::Over50);
        assert_eq!("unsure".parse::<Support>().unwrap(), Support::Unsure);
        assert_eq!(
            "more-skeptical".parse::<OpinionChange>().unwrap(),
            OpinionChange::MoreSkeptical
        );
        assert!("maybe".parse::<Support>().is_err());
    }
}
