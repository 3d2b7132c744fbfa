//! Scenario evaluation logic

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::ScenarioError;
use crate::models::{
    EnergyFlow, EnergyMix, EnergySource, FlowBalance, FlowLink, FlowNode, MixMetrics,
    ScenarioInputs, ScenarioOutputs,
};
use crate::reference;

/// Coefficients behind the closed-form scenario metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelConstants {
    pub co2_per_reactor: f64,            // Mt CO2 avoided per reactor-year
    pub output_per_reactor: f64,         // TWh per reactor-year at full funding
    pub biodiversity_per_water_pct: f64,
    pub base_demand: f64,                // TWh today
    pub horizon_years: i32,
}

/// Which coefficient set to evaluate with.
///
/// `Standard` uses published per-reactor figures. `Normalized` keeps the
/// per-reactor figures at unit scale, as one of the dashboards did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelProfile {
    #[default]
    Standard,
    Normalized,
}

impl ModelProfile {
    pub fn constants(self) -> ModelConstants {
        match self {
            ModelProfile::Standard => ModelConstants {
                co2_per_reactor: 4.8,
                output_per_reactor: 8.2,
                ..ModelConstants::SHARED
            },
            ModelProfile::Normalized => ModelConstants {
                co2_per_reactor: 0.5,
                output_per_reactor: 1.0,
                ..ModelConstants::SHARED
            },
        }
    }
}

impl ModelConstants {
    const SHARED: ModelConstants = ModelConstants {
        co2_per_reactor: 0.0,
        output_per_reactor: 0.0,
        biodiversity_per_water_pct: 0.8,
        base_demand: 1000.0,
        horizon_years: 10,
    };
}

impl Default for ModelConstants {
    fn default() -> Self {
        ModelProfile::default().constants()
    }
}

impl FromStr for ModelProfile {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ModelProfile::Standard),
            "normalized" | "normalised" => Ok(ModelProfile::Normalized),
            _ => Err(ScenarioError::InvalidProfile(s.to_string())),
        }
    }
}

/// Evaluate every metric for one set of inputs.
///
/// Inputs are expected to be in range already; see `ScenarioInputs::validate`.
pub fn evaluate(inputs: &ScenarioInputs, constants: &ModelConstants) -> ScenarioOutputs {
    let outputs = ScenarioOutputs {
        co2_avoided: inputs.reactors * (1.0 - inputs.green_pct / 100.0) * constants.co2_per_reactor,
        risk_index: (10.0 - inputs.regulation).max(0.0) * (inputs.reactors / 100.0),
        energy_output: inputs.reactors * (inputs.funding / 100.0) * constants.output_per_reactor,
        projected_demand: projected_demand(inputs.pop_growth, constants),
        biodiversity_impact: inputs.water_pct * constants.biodiversity_per_water_pct,
        mix_metrics: inputs.mix.as_ref().map(mix_metrics),
    };

    debug!(?inputs, ?outputs, "evaluated scenario");
    outputs
}

/// Demand after compounding population growth over the horizon
pub fn projected_demand(pop_growth: f64, constants: &ModelConstants) -> f64 {
    constants.base_demand * (1.0 + pop_growth / 100.0).powi(constants.horizon_years)
}

/// Mix-weighted capacity factor and CO2 intensity from the reference table
pub fn mix_metrics(mix: &EnergyMix) -> MixMetrics {
    let mut weighted_capacity_factor = 0.0;
    let mut weighted_co2_intensity = 0.0;

    for (source, weight) in mix.weights() {
        let metrics = reference::metrics_for(source);
        weighted_capacity_factor += weight / 100.0 * metrics.capacity_factor;
        weighted_co2_intensity += weight / 100.0 * metrics.co2_intensity;
    }

    MixMetrics {
        weighted_capacity_factor,
        weighted_co2_intensity,
    }
}

/// Fixed share of energy output attributed to each source in the flow diagram
pub fn flow_share(source: EnergySource) -> f64 {
    match source {
        EnergySource::Nuclear => 0.4,
        EnergySource::Solar | EnergySource::Wind | EnergySource::Hydro => 0.2,
    }
}

/// Surplus when supply strictly exceeds demand, shortfall otherwise
pub fn reconcile(supplied: f64, demand: f64) -> FlowBalance {
    if supplied > demand {
        FlowBalance::Surplus(supplied - demand)
    } else {
        FlowBalance::Shortfall(demand - supplied)
    }
}

/// Build the supply-to-demand flow for a set of evaluated outputs
pub fn derive_energy_flow(outputs: &ScenarioOutputs) -> EnergyFlow {
    let mut links: Vec<FlowLink> = EnergySource::ALL
        .iter()
        .map(|&source| FlowLink {
            source: FlowNode::from(source),
            target: FlowNode::Demand,
            value: outputs.energy_output * flow_share(source),
        })
        .collect();

    let supplied: f64 = links.iter().map(|link| link.value).sum();
    let demand = outputs.projected_demand;
    let balance = reconcile(supplied, demand);
    links.push(balance.link());

    EnergyFlow {
        nodes: FlowNode::labels(),
        links,
        supplied,
        demand,
        balance,
    }
}

/// Format a flow as a readable list of links
pub fn format_energy_flow(flow: &EnergyFlow) -> String {
    let mut output = String::new();

    for link in &flow.links {
        output.push_str(&format!(
            "  {:<9} -> {:<9} {:>10.1} TWh\n",
            link.source.label(),
            link.target.label(),
            link.value
        ));
    }

    let balance = match flow.balance {
        FlowBalance::Surplus(v) => format!("surplus of {:.1} TWh", v),
        FlowBalance::Shortfall(v) => format!("shortfall of {:.1} TWh", v),
    };
    output.push_str(&format!(
        "  Supplied {:.1} TWh against {:.0} TWh demand: {}\n",
        flow.supplied, flow.demand, balance
    ));

    output
}

/// Inputs and outputs of one evaluation, ready to print or serialize
#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub inputs: ScenarioInputs,
    pub constants: ModelConstants,
    pub outputs: ScenarioOutputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<EnergyFlow>,
}

pub fn summarize(
    scenario: &str,
    inputs: ScenarioInputs,
    constants: ModelConstants,
    with_flow: bool,
) -> ScenarioSummary {
    let outputs = evaluate(&inputs, &constants);
    let flow = with_flow.then(|| derive_energy_flow(&outputs));

    ScenarioSummary {
        scenario: scenario.to_string(),
        inputs,
        constants,
        outputs,
        flow,
    }
}

impl fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.inputs;
        let o = &self.outputs;

        writeln!(f, "=== Scenario: {} ===", self.scenario)?;
        writeln!(
            f,
            "Based on current inputs: {} reactors with {}B funding and regulation level {}",
            i.reactors, i.funding, i.regulation
        )?;
        writeln!(
            f,
            "  green investment {}%, water withdrawal {}%, population growth {}%/yr",
            i.green_pct, i.water_pct, i.pop_growth
        )?;
        writeln!(f)?;

        writeln!(f, "Results:")?;
        writeln!(f, "  CO2 Avoided (Mt):      {:>8.1}", o.co2_avoided)?;
        writeln!(f, "  Risk Index (%):        {:>8.1}", o.risk_index)?;
        writeln!(f, "  Energy Output (TWh):   {:>8.1}", o.energy_output)?;
        writeln!(
            f,
            "  Projected Demand in {} Years: {:.0} TWh",
            self.constants.horizon_years, o.projected_demand
        )?;
        writeln!(f, "  Biodiversity Impact:   {:>8.1}%", o.biodiversity_impact)?;

        if let (Some(mix), Some(metrics)) = (&i.mix, &o.mix_metrics) {
            writeln!(f)?;
            writeln!(f, "Energy mix:")?;
            for (source, weight) in mix.weights() {
                writeln!(f, "  {:<8} {:>5.1}%", source, weight)?;
            }
            writeln!(
                f,
                "  Weighted capacity factor: {:.2}%",
                metrics.weighted_capacity_factor
            )?;
            writeln!(
                f,
                "  Weighted CO2 intensity:   {:.2} g/kWh",
                metrics.weighted_co2_intensity
            )?;
        }

        if let Some(flow) = &self.flow {
            writeln!(f)?;
            writeln!(f, "Energy flow:")?;
            write!(f, "{}", format_energy_flow(flow))?;
        }

        Ok(())
    }
}
