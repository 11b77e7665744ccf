use super::domain::{ClassHighest, Component, ComponentSlot, ScoreMode};
use super::error::ConfigurationIssue;

/// Check weights and marks of a course before any arithmetic runs on them.
/// Returns the weights once every slot has a usable one.
pub fn validate_components(
    components: &[Component; 3],
    tolerance: f64,
) -> Result<[f64; 3], ConfigurationIssue> {
    let mut weights = [0.0; 3];
    for (slot, component) in ComponentSlot::ordered().into_iter().zip(components) {
        let weight = component
            .weight
            .ok_or(ConfigurationIssue::MissingWeight { slot })?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigurationIssue::InvalidWeight { slot, weight });
        }
        weights[slot.index()] = weight;
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 100.0).abs() > tolerance {
        return Err(ConfigurationIssue::WeightSum { sum });
    }

    for (slot, component) in ComponentSlot::ordered().into_iter().zip(components) {
        let weight = weights[slot.index()];
        if let Some(mark) = component.mark.value() {
            if !mark.is_finite() || mark < 0.0 || mark > weight {
                return Err(ConfigurationIssue::MarkOutOfRange { slot, mark, weight });
            }
        }
    }

    Ok(weights)
}

/// Total percentage for a course. Pending components contribute nothing.
///
/// `NormalizeByHighest` scales against the class highest: a course-level value
/// divides the raw sum, per-component values rescale each mark to its weight
/// before summing.
pub fn normalize(
    components: &[Component; 3],
    weights: &[f64; 3],
    class_highest: Option<&ClassHighest>,
    mode: ScoreMode,
) -> Result<f64, ConfigurationIssue> {
    let raw_sum: f64 = components
        .iter()
        .map(|component| component.mark.contribution())
        .sum();

    match mode {
        ScoreMode::Direct => Ok(raw_sum),
        ScoreMode::NormalizeByHighest => match class_highest {
            None => Err(ConfigurationIssue::MissingClassHighest),
            Some(ClassHighest::Course(highest)) => {
                if !(highest.is_finite() && *highest > 0.0) {
                    return Err(ConfigurationIssue::NonPositiveCourseHighest { value: *highest });
                }
                Ok(raw_sum / highest * 100.0)
            }
            Some(ClassHighest::PerComponent(highest)) => {
                let mut total = 0.0;
                for (((slot, component), weight), highest) in ComponentSlot::ordered()
                    .into_iter()
                    .zip(components)
                    .zip(weights)
                    .zip(highest)
                {
                    if !(highest.is_finite() && *highest > 0.0) {
                        return Err(ConfigurationIssue::NonPositiveComponentHighest {
                            slot,
                            value: *highest,
                        });
                    }
                    total += component.mark.contribution() / highest * weight;
                }
                Ok(total)
            }
        },
    }
}
