//! Published reference figures per energy source, plus the fact sheet

use crate::models::EnergySource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMetrics {
    pub source: EnergySource,
    pub capacity_factor: f64, // %
    pub co2_intensity: f64,   // g CO2-eq/kWh, lifecycle
}

pub const SOURCE_METRICS: [SourceMetrics; 4] = [
    SourceMetrics {
        source: EnergySource::Nuclear,
        capacity_factor: 81.5,
        co2_intensity: 12.0,
    },
    SourceMetrics {
        source: EnergySource::Solar,
        capacity_factor: 23.5,
        co2_intensity: 48.0,
    },
    SourceMetrics {
        source: EnergySource::Wind,
        capacity_factor: 36.0,
        co2_intensity: 11.0,
    },
    SourceMetrics {
        source: EnergySource::Hydro,
        capacity_factor: 44.0,
        co2_intensity: 24.0,
    },
];

pub fn metrics_for(source: EnergySource) -> SourceMetrics {
    match source {
        EnergySource::Nuclear => SOURCE_METRICS[0],
        EnergySource::Solar => SOURCE_METRICS[1],
        EnergySource::Wind => SOURCE_METRICS[2],
        EnergySource::Hydro => SOURCE_METRICS[3],
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Fact {
    pub label: &'static str,
    pub value: &'static str,
    pub source: &'static str,
}

const fn fact(label: &'static str, value: &'static str, source: &'static str) -> Fact {
    Fact {
        label,
        value,
        source,
    }
}

pub const FACTS: [Fact; 8] = [
    fact("US nuclear share of electricity", "~19%", "world-nuclear.org"),
    fact("Typical CO2 avoided", "~4.8 Mt/year/reactor", "world-nuclear.org"),
    fact("Average output", "8.2 TWh/reactor/year", "world-nuclear.org"),
    fact("Spent fuel", "~21.5 t/reactor/year", "energy.gov"),
    fact("Cumulative reactor-years", "18,500", "world-nuclear.org"),
    fact("Major incidents", "2", "world-nuclear.org"),
    fact("Support building new nuclear (2024)", "56%", "pewresearch.org"),
    fact("Support using nuclear power", "61%", "Gallup"),
];
