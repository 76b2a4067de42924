//! Output formatting for CLI results

use colorful::Colorful;

use crate::core::{FeatureValues, ResultSet, StageRegistry};

/// Frames shown per feature unless verbose
const PREVIEW_FRAMES: usize = 1;

/// Format every feature of `results` for the terminal
pub fn format_results(results: &ResultSet, verbose: bool) -> String {
    let mut output = String::new();
    for (name, values) in results.iter() {
        output.push_str(&format!(
            "{} {}\n",
            name.bold().cyan(),
            format!("{} x {}", values.frames(), values.frame_len()).dim()
        ));
        output.push_str(&format_values(values, verbose));
    }
    output
}

fn format_values(values: &FeatureValues, verbose: bool) -> String {
    let mut output = String::new();
    let shown = if verbose { values.frames() } else { PREVIEW_FRAMES };

    for (index, frame) in values.iter_frames().take(shown).enumerate() {
        let row: Vec<String> = frame.iter().map(|v| format!("{:.4}", v)).collect();
        output.push_str(&format!("  [{:>4}] {}\n", index, row.join(" ")));
    }
    if values.frames() > shown {
        output.push_str(&format!(
            "  {}\n",
            format!("... {} more frame(s)", values.frames() - shown).dim()
        ));
    }
    if !values.all_finite() {
        output.push_str(&format!("  {}\n", "contains non-finite values".yellow()));
    }
    output
}

/// Serialise `results` as pretty JSON
pub fn format_json(results: &ResultSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

/// One line per registered stage
pub fn format_stage_list(registry: &StageRegistry) -> String {
    let width = registry.describe().map(|(name, _)| name.len()).max().unwrap_or(0);
    registry
        .describe()
        .map(|(name, description)| format!("  {:<width$}  {}\n", name, description, width = width))
        .collect()
}
