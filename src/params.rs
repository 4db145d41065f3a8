//! Parameter Model
//!
//! Editable grid and potential parameters as the user sees them. Values are
//! stored exactly as entered (no clamping); rejection of bad values happens
//! when a request is built.

use crate::config::DefaultsConfig;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Potential model selected for a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotentialType {
    #[serde(rename = "Morse", alias = "morse")]
    Morse,
    #[serde(rename = "Softcore", alias = "softcore")]
    Softcore,
    #[serde(rename = "surface_3d", alias = "Surface3D", alias = "surface3d")]
    Surface3D,
    #[serde(rename = "energy_levels", alias = "EnergyLevels")]
    EnergyLevels,
}

impl PotentialType {
    pub const ALL: [PotentialType; 4] = [
        PotentialType::Morse,
        PotentialType::Softcore,
        PotentialType::Surface3D,
        PotentialType::EnergyLevels,
    ];

    /// Name used on the wire (`plot_type`).
    pub fn wire_name(self) -> &'static str {
        match self {
            PotentialType::Morse => "Morse",
            PotentialType::Softcore => "Softcore",
            PotentialType::Surface3D => "surface_3d",
            PotentialType::EnergyLevels => "energy_levels",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PotentialType::Morse => "Morse Potential",
            PotentialType::Softcore => "Softcore Potential",
            PotentialType::Surface3D => "3D Surface Plot",
            PotentialType::EnergyLevels => "Energy Level Diagram",
        }
    }

    /// Fields accepted by this potential type, in display order.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            PotentialType::Morse => MORSE_FIELDS,
            PotentialType::Softcore => SOFTCORE_FIELDS,
            PotentialType::Surface3D | PotentialType::EnergyLevels => OPAQUE_FIELDS,
        }
    }

    /// Look up a field by key or alias.
    pub fn field(self, key: &str) -> Option<&'static FieldSpec> {
        self.fields()
            .iter()
            .find(|spec| spec.key == key || spec.aliases.contains(&key))
    }
}

impl fmt::Display for PotentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for PotentialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morse" => Ok(PotentialType::Morse),
            "softcore" => Ok(PotentialType::Softcore),
            "surface_3d" | "surface3d" | "surface-3d" => Ok(PotentialType::Surface3D),
            "energy_levels" | "energylevels" | "energy-levels" => Ok(PotentialType::EnergyLevels),
            _ => Err(format!(
                "Unknown potential type '{}' (expected Morse, Softcore, surface_3d or energy_levels)",
                s
            )),
        }
    }
}

/// Storage slot behind a parameter field. Fields of different potential
/// types that share a slot keep their value when the type changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSlot {
    /// Dissociation energy `D` (Morse) or charge `q` (Softcore)
    Strength,
    Width,
    Center,
}

/// One row of the field mapping table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub wire_key: &'static str,
    pub label: &'static str,
    pub slot: ParameterSlot,
    pub positive: bool,
}

const MORSE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "D",
        aliases: &[],
        wire_key: "D",
        label: "Dissociation Energy (D)",
        slot: ParameterSlot::Strength,
        positive: true,
    },
    FieldSpec {
        key: "a",
        aliases: &[],
        wire_key: "a",
        label: "Width Parameter (a)",
        slot: ParameterSlot::Width,
        positive: true,
    },
    FieldSpec {
        key: "r0",
        aliases: &[],
        wire_key: "r0",
        label: "Equilibrium Distance (r0)",
        slot: ParameterSlot::Center,
        positive: false,
    },
];

const SOFTCORE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "q",
        aliases: &["Charge"],
        wire_key: "Charge",
        label: "Charge (q)",
        slot: ParameterSlot::Strength,
        positive: false,
    },
    FieldSpec {
        key: "a",
        aliases: &[],
        wire_key: "a",
        label: "Softcore Parameter (a)",
        slot: ParameterSlot::Width,
        positive: true,
    },
    FieldSpec {
        key: "r0",
        aliases: &[],
        wire_key: "r0",
        label: "Center (r0)",
        slot: ParameterSlot::Center,
        positive: false,
    },
];

// The service owns the schema of these types; forward the populated slots.
const OPAQUE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "D",
        aliases: &[],
        wire_key: "D",
        label: "Strength (D)",
        slot: ParameterSlot::Strength,
        positive: false,
    },
    FieldSpec {
        key: "a",
        aliases: &[],
        wire_key: "a",
        label: "Width (a)",
        slot: ParameterSlot::Width,
        positive: false,
    },
    FieldSpec {
        key: "r0",
        aliases: &[],
        wire_key: "r0",
        label: "Center (r0)",
        slot: ParameterSlot::Center,
        positive: false,
    },
];

/// Grid as entered by the user. `n_grid` stays a float until validation so
/// that fractional or unparsable input can be reported instead of truncated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridInput {
    #[serde(alias = "rMin", alias = "rmin")]
    pub r_min: f64,
    #[serde(alias = "rMax", alias = "rmax")]
    pub r_max: f64,
    #[serde(alias = "nGrid", alias = "ngrid")]
    pub n_grid: f64,
}

impl Default for GridInput {
    fn default() -> Self {
        Self {
            r_min: -0.0,
            r_max: 10.0,
            n_grid: 100.0,
        }
    }
}

/// Numeric parameter slots shared by all potential types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(alias = "D", alias = "d", alias = "q")]
    pub strength: f64,
    #[serde(alias = "a")]
    pub width: f64,
    #[serde(alias = "r0")]
    pub center: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            strength: 100.0,
            width: 1.5,
            center: 2.0,
        }
    }
}

impl ParameterSet {
    pub fn get(&self, slot: ParameterSlot) -> f64 {
        match slot {
            ParameterSlot::Strength => self.strength,
            ParameterSlot::Width => self.width,
            ParameterSlot::Center => self.center,
        }
    }

    pub fn set(&mut self, slot: ParameterSlot, value: f64) {
        match slot {
            ParameterSlot::Strength => self.strength = value,
            ParameterSlot::Width => self.width = value,
            ParameterSlot::Center => self.center = value,
        }
    }
}

/// Which editable container a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Grid,
    Potential,
}

/// Parse numeric text input. Anything that is not a number becomes `NaN`.
pub fn parse_numeric(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Session-wide editable state: grid, selected potential type and values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterModel {
    grid: GridInput,
    plot_type: PotentialType,
    values: ParameterSet,
}

impl Default for ParameterModel {
    fn default() -> Self {
        Self::new(
            GridInput::default(),
            PotentialType::Morse,
            ParameterSet::default(),
        )
    }
}

impl ParameterModel {
    pub fn new(grid: GridInput, plot_type: PotentialType, values: ParameterSet) -> Self {
        Self {
            grid,
            plot_type,
            values,
        }
    }

    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self::new(defaults.grid, defaults.plot_type, defaults.parameters)
    }

    pub fn grid(&self) -> &GridInput {
        &self.grid
    }

    pub fn plot_type(&self) -> PotentialType {
        self.plot_type
    }

    pub fn values(&self) -> &ParameterSet {
        &self.values
    }

    /// Active fields with their current values.
    pub fn fields(&self) -> Vec<(&'static FieldSpec, f64)> {
        self.plot_type
            .fields()
            .iter()
            .map(|spec| (spec, self.values.get(spec.slot)))
            .collect()
    }

    /// Switch potential type. Values live in shared slots and are kept.
    pub fn select_type(&mut self, plot_type: PotentialType) {
        self.plot_type = plot_type;
    }

    /// Replace one field, leaving all others untouched.
    pub fn set_field(
        &mut self,
        container: Container,
        key: &str,
        value: f64,
    ) -> Result<(), ValidationError> {
        match container {
            Container::Grid => match key {
                "rMin" | "r_min" => self.grid.r_min = value,
                "rMax" | "r_max" => self.grid.r_max = value,
                "nGrid" | "n_grid" => self.grid.n_grid = value,
                _ => {
                    return Err(ValidationError::UnknownGridField {
                        field: key.to_string(),
                    })
                }
            },
            Container::Potential => {
                let spec =
                    self.plot_type
                        .field(key)
                        .ok_or_else(|| ValidationError::UnknownField {
                            field: key.to_string(),
                            plot_type: self.plot_type,
                        })?;
                self.values.set(spec.slot, value);
            }
        }
        Ok(())
    }

    /// Text variant of [`set_field`](Self::set_field). Unparsable text is
    /// stored as `NaN`; only an unknown key is an error here.
    pub fn set_field_text(
        &mut self,
        container: Container,
        key: &str,
        text: &str,
    ) -> Result<(), ValidationError> {
        self.set_field(container, key, parse_numeric(text))
    }
}
