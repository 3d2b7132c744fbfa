//! Plain-text bar charts

const BAR_CHAR: char = '█';
const ALT_BAR_CHAR: char = '▒';

fn bar(value: f64, max: f64, width: usize, fill: char) -> String {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64).round() as usize;
    fill.to_string().repeat(len.min(width))
}

/// Single-series horizontal bar chart, bars scaled to the largest value
pub fn bars(rows: &[(String, f64)], width: usize) -> String {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0, f64::max);

    let mut output = String::new();
    for (label, value) in rows {
        output.push_str(&format!(
            "{:<lw$} | {} {}\n",
            label,
            bar(*value, max, width, BAR_CHAR),
            value,
            lw = label_width
        ));
    }
    output
}

/// Grouped horizontal bar chart.
///
/// Each group gets one bar per series; all bars share a single scale.
/// `series` names label the legend and must match the length of each
/// group's values.
pub fn grouped_bars(groups: &[(String, Vec<f64>)], series: &[&str], width: usize) -> String {
    let fills = [BAR_CHAR, ALT_BAR_CHAR];
    let label_width = groups
        .iter()
        .map(|(l, _)| l.chars().count())
        .chain(series.iter().map(|s| s.chars().count() + 2))
        .max()
        .unwrap_or(0);
    let max = groups
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold(0.0, f64::max);

    let mut output = String::new();
    let legend: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", fills[i % fills.len()], name))
        .collect();
    output.push_str(&format!("{}\n", legend.join("   ")));

    for (label, values) in groups {
        output.push_str(&format!("{}\n", label));
        for (i, value) in values.iter().enumerate() {
            let name = series.get(i).copied().unwrap_or("");
            output.push_str(&format!(
                "  {:<lw$} | {} {:.1}\n",
                name,
                bar(*value, max, width, fills[i % fills.len()]),
                value,
                lw = label_width.saturating_sub(2)
            ));
        }
    }
    output
}
