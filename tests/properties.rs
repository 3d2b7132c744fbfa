//! Property-based tests for the scenario evaluator.
//!
//! Covers: output bounds, monotonicity in each control, mix-weighted
//! reference figures and flow reconciliation.

use energy_scenario::calculator::{ModelProfile, derive_energy_flow, evaluate, mix_metrics};
use energy_scenario::models::{EnergyMix, FlowBalance, FlowNode, ScenarioInputs};
use energy_scenario::reference::SOURCE_METRICS;
use proptest::prelude::*;

fn arb_inputs() -> impl Strategy<Value = ScenarioInputs> {
    (
        0.0f64..=100.0,
        0.0f64..=10.0,
        0.0f64..=200.0,
        0.0f64..=100.0,
        0.0f64..=100.0,
        0.0f64..=5.0,
    )
        .prop_map(|(funding, regulation, reactors, green_pct, water_pct, pop_growth)| {
            ScenarioInputs {
                funding,
                regulation,
                reactors,
                green_pct,
                water_pct,
                pop_growth,
                mix: None,
            }
        })
}

fn arb_mix() -> impl Strategy<Value = EnergyMix> {
    (0.0f64..=100.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(nuclear, s, w)| {
        let solar = (100.0 - nuclear) * s;
        let wind = (100.0 - nuclear - solar) * w;
        EnergyMix::new(nuclear, solar, wind).unwrap()
    })
}

fn arb_profile() -> impl Strategy<Value = ModelProfile> {
    prop_oneof![Just(ModelProfile::Standard), Just(ModelProfile::Normalized)]
}

// ── Output Bounds ────────────────────────────────────────────────────

proptest! {
    /// Generated inputs pass boundary validation.
    #[test]
    fn generated_inputs_are_valid(inputs in arb_inputs()) {
        prop_assert!(inputs.validate().is_ok());
    }

    /// Risk index is never negative.
    #[test]
    fn risk_index_non_negative(inputs in arb_inputs(), profile in arb_profile()) {
        let outputs = evaluate(&inputs, &profile.constants());
        prop_assert!(outputs.risk_index >= 0.0);
    }

    /// All metrics are finite and non-negative over the valid ranges.
    #[test]
    fn outputs_finite(inputs in arb_inputs(), profile in arb_profile()) {
        let o = evaluate(&inputs, &profile.constants());
        let metrics = [
            o.co2_avoided,
            o.risk_index,
            o.energy_output,
            o.projected_demand,
            o.biodiversity_impact,
        ];
        for value in metrics {
            prop_assert!(value.is_finite() && value >= 0.0, "bad metric {}", value);
        }
        prop_assert!(o.projected_demand >= 1000.0);
    }
}

// ── Monotonicity ─────────────────────────────────────────────────────

proptest! {
    /// More green investment never increases CO2 avoided.
    #[test]
    fn co2_non_increasing_in_green_pct(
        inputs in arb_inputs(),
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
    ) {
        let constants = ModelProfile::Standard.constants();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = evaluate(&ScenarioInputs { green_pct: lo, ..inputs.clone() }, &constants);
        let high = evaluate(&ScenarioInputs { green_pct: hi, ..inputs }, &constants);
        prop_assert!(high.co2_avoided <= low.co2_avoided + 1e-9);
    }

    /// Energy output never drops with more funding.
    #[test]
    fn output_non_decreasing_in_funding(
        inputs in arb_inputs(),
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
    ) {
        let constants = ModelProfile::Standard.constants();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = evaluate(&ScenarioInputs { funding: lo, ..inputs.clone() }, &constants);
        let high = evaluate(&ScenarioInputs { funding: hi, ..inputs }, &constants);
        prop_assert!(high.energy_output + 1e-9 >= low.energy_output);
    }

    /// Energy output never drops with more reactors.
    #[test]
    fn output_non_decreasing_in_reactors(
        inputs in arb_inputs(),
        a in 0.0f64..=200.0,
        b in 0.0f64..=200.0,
    ) {
        let constants = ModelProfile::Standard.constants();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = evaluate(&ScenarioInputs { reactors: lo, ..inputs.clone() }, &constants);
        let high = evaluate(&ScenarioInputs { reactors: hi, ..inputs }, &constants);
        prop_assert!(high.energy_output + 1e-9 >= low.energy_output);
    }
}

// ── Energy Mix ───────────────────────────────────────────────────────

proptest! {
    /// Weights always sum to 100 with hydro as the remainder.
    #[test]
    fn mix_sums_to_one_hundred(mix in arb_mix()) {
        let total: f64 = mix.weights().iter().map(|(_, w)| w).sum();
        prop_assert!((total - 100.0).abs() < 1e-9);
    }

    /// Weighted figures stay within the reference table's extremes.
    #[test]
    fn weighted_metrics_are_convex(mix in arb_mix()) {
        let metrics = mix_metrics(&mix);
        let cf = SOURCE_METRICS.iter().map(|m| m.capacity_factor);
        let co2 = SOURCE_METRICS.iter().map(|m| m.co2_intensity);
        let cf_min = cf.clone().fold(f64::MAX, f64::min);
        let cf_max = cf.fold(f64::MIN, f64::max);
        let co2_min = co2.clone().fold(f64::MAX, f64::min);
        let co2_max = co2.fold(f64::MIN, f64::max);

        prop_assert!(metrics.weighted_capacity_factor >= cf_min - 1e-9);
        prop_assert!(metrics.weighted_capacity_factor <= cf_max + 1e-9);
        prop_assert!(metrics.weighted_co2_intensity >= co2_min - 1e-9);
        prop_assert!(metrics.weighted_co2_intensity <= co2_max + 1e-9);
    }
}

// ── Flow Reconciliation ──────────────────────────────────────────────

proptest! {
    /// Supply plus shortfall, or supply minus surplus, equals demand.
    #[test]
    fn flow_balances_demand(inputs in arb_inputs(), profile in arb_profile()) {
        let outputs = evaluate(&inputs, &profile.constants());
        let flow = derive_energy_flow(&outputs);

        prop_assert_eq!(flow.links.len(), 5);
        let reconciled = match flow.balance {
            FlowBalance::Surplus(v) => {
                prop_assert!(v > 0.0);
                flow.supplied - v
            }
            FlowBalance::Shortfall(v) => {
                prop_assert!(v >= 0.0);
                flow.supplied + v
            }
        };
        prop_assert!((reconciled - outputs.projected_demand).abs() < 1e-6);

        for link in &flow.links[..4] {
            prop_assert_eq!(link.target, FlowNode::Demand);
        }
    }
}
