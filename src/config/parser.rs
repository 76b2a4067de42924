// src/config/parser.rs
//
// Text form of feature descriptions, one feature per line:
//
//   MFCC [Window(length=512, step=256), RDFT, SpectralEnergy, FilterBank(squared=true), Log, DCT]
//   WPP[Window(length=512, type=rectangular), Energy]
//
// Blank lines and lines starting with '#' are skipped.

use std::collections::BTreeMap;

use super::description::{FeatureSpec, StageSpec};
use crate::error::{Error, Result};

/// Parse a whole description, reporting 1-based line numbers on error
pub fn parse_description(text: &str) -> Result<Vec<FeatureSpec>> {
    let mut features = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        features.push(parse_feature(trimmed, index + 1)?);
    }
    Ok(features)
}

/// Parse a single `NAME[stages]` line
pub fn parse_feature(line: &str, line_no: usize) -> Result<FeatureSpec> {
    let fail = |reason: String| Error::Description { line: line_no, reason };

    let line = line.trim();
    let open = line
        .find('[')
        .ok_or_else(|| fail(format!("expected NAME[...], got \"{}\"", line)))?;
    let name = line[..open].trim();
    if !is_identifier(name) {
        return Err(fail(format!("invalid feature name \"{}\"", name)));
    }
    let body = line[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| fail(format!("feature \"{}\" is missing the closing ']'", name)))?;

    let mut stages = Vec::new();
    if !body.trim().is_empty() {
        for part in split_top_level(body).map_err(&fail)? {
            stages.push(parse_stage(part).map_err(&fail)?);
        }
    }
    Ok(FeatureSpec::new(name, stages))
}

fn parse_stage(text: &str) -> std::result::Result<StageSpec, String> {
    let text = text.trim();
    let (name, params) = match text.find('(') {
        None => (text, ""),
        Some(open) => {
            let inner = text[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| format!("stage \"{}\" is missing the closing ')'", text))?;
            (text[..open].trim(), inner)
        }
    };
    if name.is_empty() {
        return Err("empty stage name".to_string());
    }
    if !is_identifier(name) {
        return Err(format!("invalid stage name \"{}\"", name));
    }

    let mut parameters = BTreeMap::new();
    if !params.trim().is_empty() {
        for pair in params.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("{}: expected key=value, got \"{}\"", name, pair.trim()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("{}: empty parameter name", name));
            }
            if parameters
                .insert(key.to_string(), value.trim().to_string())
                .is_some()
            {
                return Err(format!("{}: parameter \"{}\" given twice", name, key));
            }
        }
    }
    Ok(StageSpec::with_parameters(name, parameters))
}

/// Split on commas outside parentheses
fn split_top_level(body: &str) -> std::result::Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced ')'".to_string());
                }
            }
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '('".to_string());
    }
    parts.push(&body[start..]);
    if parts.iter().any(|p| p.trim().is_empty()) {
        return Err("empty stage in list".to_string());
    }
    Ok(parts)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description() {
        let text = "\
# speech features
MFCC[Window(length=25, step=10), DFT, MelFreq(size=16), Log10, DCT(engine=Kiss)]
PLP[Window(length=25, step=10), IntensityLoudness(direction=i2l), IDFT, AutoRegressiveAnalysis(), LPCtoCC]

SBC [Window(length = 32), RDFT]
WPP[Window(length=512, type=rectangular), DWPT, SubbandEnergy, Log, DWPT(order=4, tree=1 2 3 3)]
";
        let features = parse_description(text).unwrap();
        assert_eq!(features.len(), 4);

        let plp = &features[1];
        assert_eq!(plp.name(), "PLP");
        let names: Vec<_> = plp.stages().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["Window", "IntensityLoudness", "IDFT", "AutoRegressiveAnalysis", "LPCtoCC"]
        );
        assert_eq!(plp.stages()[1].parameters()["direction"], "i2l");
        assert!(plp.stages()[3].parameters().is_empty());

        let sbc = &features[2];
        assert_eq!(sbc.name(), "SBC");
        assert_eq!(sbc.stages()[0].parameters()["length"], "32");

        let wpp = &features[3];
        assert_eq!(wpp.stages()[4].parameters()["tree"], "1 2 3 3");
        assert_eq!(wpp.stages()[4].parameters()["order"], "4");
    }

    #[test]
    fn test_errors_report_line() {
        let err = parse_description("A[Window(length=4)]\nB[Window(length=4]").unwrap_err();
        assert!(matches!(err, Error::Description { line: 2, .. }));

        for bad in [
            "A Window",
            "[Window]",
            "A[Window, , RDFT]",
            "A[Window(length)]",
            "A[Window(length=1, length=2)]",
            "A[(length=1)]",
            "A[Window))]",
        ] {
            assert!(parse_feature(bad, 1).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_empty_body_is_featureless() {
        let feature = parse_feature("Empty[]", 1).unwrap();
        assert!(feature.stages().is_empty());
    }
}
