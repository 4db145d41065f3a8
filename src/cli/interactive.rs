//! Interactive session: edit parameters, generate and export from prompts.

use crate::cli::presentation::{format_generation_text, GenerationReport};
use crate::controller::GenerationState;
use crate::error::ApiError;
use crate::params::{Container, PotentialType};
use crate::session::PlotSession;
use dialoguer::{Input, Select};
use tokio::runtime::Runtime;

const ACTIONS: &[&str] = &[
    "Generate plot",
    "Change potential type",
    "Edit grid field",
    "Edit potential parameter",
    "Export image",
    "Quit",
];

const GRID_FIELDS: &[&str] = &["rMin", "rMax", "nGrid"];

fn input_error(e: dialoguer::Error) -> ApiError {
    ApiError::PromptError(format!("Failed to get user input: {}", e))
}

/// Run the prompt loop until the user quits. Returns a closing summary.
pub fn run(runtime: &Runtime, mut session: PlotSession) -> Result<String, ApiError> {
    let mut generated = 0usize;
    loop {
        let choice = Select::new()
            .with_prompt(format!("Potential: {}", session.model().plot_type().label()))
            .items(ACTIONS)
            .default(0)
            .interact()
            .map_err(input_error)?;

        match choice {
            0 => {
                let state = runtime.block_on(session.generate());
                if matches!(state, GenerationState::Success { .. }) {
                    generated += 1;
                }
                let endpoint = session.controller().endpoint().to_string();
                let report = GenerationReport {
                    plot_type: session.model().plot_type(),
                    endpoint: &endpoint,
                    state: &state,
                    target: session.adapter().target(),
                    export: None,
                };
                println!("{}", format_generation_text(&report));
            }
            1 => {
                let labels: Vec<&str> = PotentialType::ALL.iter().map(|t| t.label()).collect();
                let current = PotentialType::ALL
                    .iter()
                    .position(|t| *t == session.model().plot_type())
                    .unwrap_or(0);
                let index = Select::new()
                    .with_prompt("Potential type")
                    .items(&labels)
                    .default(current)
                    .interact()
                    .map_err(input_error)?;
                session.select_type(PotentialType::ALL[index]);
            }
            2 => {
                let grid = session.model().grid();
                let values = [grid.r_min, grid.r_max, grid.n_grid];
                let items: Vec<String> = GRID_FIELDS
                    .iter()
                    .zip(values)
                    .map(|(key, value)| format!("{} = {}", key, value))
                    .collect();
                let index = Select::new()
                    .with_prompt("Grid field")
                    .items(&items)
                    .interact()
                    .map_err(input_error)?;
                edit_field(&mut session, Container::Grid, GRID_FIELDS[index])?;
            }
            3 => {
                let fields = session.model().fields();
                let items: Vec<String> = fields
                    .iter()
                    .map(|(spec, value)| format!("{} = {}", spec.label, value))
                    .collect();
                let index = Select::new()
                    .with_prompt("Parameter")
                    .items(&items)
                    .interact()
                    .map_err(input_error)?;
                let key = fields[index].0.key;
                edit_field(&mut session, Container::Potential, key)?;
            }
            4 => match session.export_default() {
                Ok(image) => println!("Export written to {}", image.path.display()),
                Err(e) => println!("{}", e),
            },
            _ => break,
        }
    }
    Ok(format!("Interactive session ended ({} plot(s) generated)", generated))
}

fn edit_field(session: &mut PlotSession, container: Container, key: &str) -> Result<(), ApiError> {
    let text: String = Input::new()
        .with_prompt(key)
        .allow_empty(true)
        .interact_text()
        .map_err(input_error)?;
    if let Err(e) = session.set_field_text(container, key, &text) {
        println!("{}", e);
    }
    Ok(())
}
