//! Request Builder
//!
//! Pure mapping from the Parameter Model to the wire request. All input
//! validation for a generation attempt happens here.

use crate::error::ValidationError;
use crate::params::{GridInput, ParameterSet, PotentialType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Validated sampling domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    r_min: f64,
    r_max: f64,
    n_grid: u32,
}

impl GridSpec {
    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    pub fn n_grid(&self) -> u32 {
        self.n_grid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MorseParameters {
    #[serde(rename = "D")]
    pub d: f64,
    pub a: f64,
    pub r0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoftcoreParameters {
    #[serde(rename = "Charge")]
    pub q: f64,
    pub a: f64,
    pub r0: f64,
}

/// Parameter set tagged by potential type. Serializes as the bare field
/// object; the tag travels separately as `plot_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PotentialParameters {
    Morse(MorseParameters),
    Softcore(SoftcoreParameters),
    Surface3D(BTreeMap<String, f64>),
    EnergyLevels(BTreeMap<String, f64>),
}

impl PotentialParameters {
    pub fn potential_type(&self) -> PotentialType {
        match self {
            PotentialParameters::Morse(_) => PotentialType::Morse,
            PotentialParameters::Softcore(_) => PotentialType::Softcore,
            PotentialParameters::Surface3D(_) => PotentialType::Surface3D,
            PotentialParameters::EnergyLevels(_) => PotentialType::EnergyLevels,
        }
    }

    fn from_values(plot_type: PotentialType, values: &ParameterSet) -> Self {
        match plot_type {
            PotentialType::Morse => PotentialParameters::Morse(MorseParameters {
                d: values.strength,
                a: values.width,
                r0: values.center,
            }),
            PotentialType::Softcore => PotentialParameters::Softcore(SoftcoreParameters {
                q: values.strength,
                a: values.width,
                r0: values.center,
            }),
            PotentialType::Surface3D => {
                PotentialParameters::Surface3D(opaque_fields(plot_type, values))
            }
            PotentialType::EnergyLevels => {
                PotentialParameters::EnergyLevels(opaque_fields(plot_type, values))
            }
        }
    }
}

fn opaque_fields(plot_type: PotentialType, values: &ParameterSet) -> BTreeMap<String, f64> {
    plot_type
        .fields()
        .iter()
        .map(|spec| (spec.wire_key.to_string(), values.get(spec.slot)))
        .collect()
}

/// One generation attempt's payload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    grid: GridSpec,
    plot_type: PotentialType,
    parameters: PotentialParameters,
}

impl GenerationRequest {
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn plot_type(&self) -> PotentialType {
        self.plot_type
    }

    pub fn parameters(&self) -> &PotentialParameters {
        &self.parameters
    }

    /// Wire payload as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        // Every field is a finite number or a plain string, so this cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Validate inputs and build the request for `plot_type`.
///
/// Stops at the first violation: grid bounds, grid size, then the active
/// parameter fields in display order.
pub fn build(
    grid: &GridInput,
    plot_type: PotentialType,
    values: &ParameterSet,
) -> Result<GenerationRequest, ValidationError> {
    let grid = validate_grid(grid)?;

    for spec in plot_type.fields() {
        let value = values.get(spec.slot);
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                field: spec.key.to_string(),
                value,
            });
        }
        if spec.positive && value <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: spec.key.to_string(),
                value,
            });
        }
    }

    Ok(GenerationRequest {
        grid,
        plot_type,
        parameters: PotentialParameters::from_values(plot_type, values),
    })
}

fn validate_grid(grid: &GridInput) -> Result<GridSpec, ValidationError> {
    for (field, value) in [("rMin", grid.r_min), ("rMax", grid.r_max)] {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                field: field.to_string(),
                value,
            });
        }
    }
    if grid.r_min >= grid.r_max {
        return Err(ValidationError::EmptyRange {
            r_min: grid.r_min,
            r_max: grid.r_max,
        });
    }

    let n = grid.n_grid;
    if !n.is_finite() || n.fract() != 0.0 || n < 2.0 || n > f64::from(u32::MAX) {
        return Err(ValidationError::GridPoints { value: n });
    }

    Ok(GridSpec {
        r_min: grid.r_min,
        r_max: grid.r_max,
        n_grid: n as u32,
    })
}
