//! Minimum marks still needed in remaining components to reach a target grade.

use super::domain::{ComponentSlot, GradePoint, Mark};
use serde::{Deserialize, Serialize};

const CAPACITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionStatus {
    AlreadyAchieved,
    Unreachable,
    Reachable,
}

impl ProjectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlreadyAchieved => "Already achieved",
            Self::Unreachable => "Unreachable",
            Self::Reachable => "Reachable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreachableReason {
    NoAttemptedComponents,
    InsufficientCapacity,
}

/// Mark required in one attempted component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub slot: ComponentSlot,
    pub weight: f64,
    pub required: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub status: ProjectionStatus,
    pub target_grade_point: GradePoint,
    pub target_percent: f64,
    pub current_sum: f64,
    pub need: f64,
    pub capacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreachable_reason: Option<UnreachableReason>,
    /// Need spread over attempted components in proportion to their weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportional_allocation: Option<Vec<ComponentRequirement>>,
    /// Minimum for each attempted component alone, with every other attempted
    /// component at full marks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_component_minimums: Option<Vec<ComponentRequirement>>,
}

impl ProjectionResult {
    pub fn proportional_for(&self, slot: ComponentSlot) -> Option<f64> {
        find_requirement(self.proportional_allocation.as_deref(), slot)
    }

    pub fn single_minimum_for(&self, slot: ComponentSlot) -> Option<f64> {
        find_requirement(self.single_component_minimums.as_deref(), slot)
    }
}

fn find_requirement(requirements: Option<&[ComponentRequirement]>, slot: ComponentSlot) -> Option<f64> {
    requirements?
        .iter()
        .find(|requirement| requirement.slot == slot)
        .map(|requirement| requirement.required)
}

/// Project what the attempted components must score for `target_grade_point`.
///
/// Marks are taken as entered (the absolute table is used for the target), and
/// capacity is the full weight of every component flagged as attempted.
pub fn project(
    current_marks: [Mark; 3],
    weights: [f64; 3],
    attempt_flags: [bool; 3],
    target_grade_point: GradePoint,
) -> ProjectionResult {
    let target_percent = target_grade_point.absolute_floor();
    let current_sum: f64 = current_marks.iter().map(|mark| mark.contribution()).sum();
    let need = target_percent - current_sum;

    let attempted: Vec<ComponentSlot> = ComponentSlot::ordered()
        .into_iter()
        .filter(|slot| attempt_flags[slot.index()])
        .collect();
    let capacity: f64 = attempted.iter().map(|slot| weights[slot.index()]).sum();

    let mut result = ProjectionResult {
        status: ProjectionStatus::Reachable,
        target_grade_point,
        target_percent,
        current_sum,
        need,
        capacity,
        unreachable_reason: None,
        proportional_allocation: None,
        single_component_minimums: None,
    };

    if need <= 0.0 {
        result.status = ProjectionStatus::AlreadyAchieved;
        return result;
    }

    if capacity <= 0.0 {
        result.status = ProjectionStatus::Unreachable;
        result.unreachable_reason = Some(UnreachableReason::NoAttemptedComponents);
        return result;
    }

    if need > capacity + CAPACITY_TOLERANCE {
        result.status = ProjectionStatus::Unreachable;
        result.unreachable_reason = Some(UnreachableReason::InsufficientCapacity);
        return result;
    }

    let proportional = attempted
        .iter()
        .map(|&slot| {
            let weight = weights[slot.index()];
            let current = current_marks[slot.index()].contribution();
            ComponentRequirement {
                slot,
                weight,
                required: (current + weight / capacity * need).min(weight),
            }
        })
        .collect();

    let single = attempted
        .iter()
        .map(|&slot| {
            let weight = weights[slot.index()];
            ComponentRequirement {
                slot,
                weight,
                required: (need - (capacity - weight)).clamp(0.0, weight),
            }
        })
        .collect();

    result.proportional_allocation = Some(proportional);
    result.single_component_minimums = Some(single);
    result
}
