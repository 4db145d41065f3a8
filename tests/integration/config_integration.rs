//! Integration tests for Configuration System

use super::test_utils::with_isolated_env;
use potplot::cli::{Commands, RunContext};
use potplot::config::{global_config_path, ConfigLoader};
use potplot::params::{ParameterModel, PotentialType};
use tempfile::TempDir;

#[test]
fn test_global_file_is_overridden_by_workspace_files() {
    let temp_dir = TempDir::new().unwrap();
    with_isolated_env(&temp_dir, || {
        let global = global_config_path().unwrap();
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        std::fs::write(
            &global,
            r#"
[service]
base_url = "http://global:8080/api"
request_timeout_secs = 15

[defaults]
plot_type = "Softcore"
"#,
        )
        .unwrap();

        let workspace = temp_dir.path().join("workspace");
        std::fs::create_dir_all(workspace.join("config")).unwrap();
        std::fs::write(
            workspace.join("config/config.toml"),
            "[service]\nbase_url = \"http://workspace:8080/api\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.service.base_url, "http://workspace:8080/api");
        assert_eq!(config.service.request_timeout_secs, Some(15));
        assert_eq!(config.defaults.plot_type, PotentialType::Softcore);
    });
}

#[test]
fn test_environment_specific_workspace_file() {
    let temp_dir = TempDir::new().unwrap();
    with_isolated_env(&temp_dir, || {
        let workspace = temp_dir.path().join("workspace");
        std::fs::create_dir_all(workspace.join("config")).unwrap();
        std::fs::write(
            workspace.join("config/config.toml"),
            "[render]\nheight = 500\n",
        )
        .unwrap();
        std::fs::write(
            workspace.join("config/staging.toml"),
            "[render]\nheight = 720\n",
        )
        .unwrap();

        let development = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(development.render.height, 500);

        std::env::set_var("POTPLOT_ENV", "staging");
        let staging = ConfigLoader::load(&workspace);
        std::env::remove_var("POTPLOT_ENV");
        assert_eq!(staging.unwrap().render.height, 720);
    });
}

#[test]
fn test_configured_defaults_seed_parameter_model() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("potplot.toml");
    std::fs::write(
        &config_file,
        r#"
[defaults]
plot_type = "energy_levels"

[defaults.grid]
rMin = 1.0
rMax = 4.0
nGrid = 32

[defaults.parameters]
D = 42.0
"#,
    )
    .unwrap();

    let config = with_isolated_env(&temp_dir, || ConfigLoader::load_from_file(&config_file))
        .unwrap();
    let model = ParameterModel::from_defaults(&config.defaults);
    assert_eq!(model.plot_type(), PotentialType::EnergyLevels);
    assert_eq!(model.grid().r_max, 4.0);
    assert_eq!(model.grid().n_grid, 32.0);
    assert_eq!(model.values().strength, 42.0);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_config_show_and_validate_commands() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("potplot.toml");
    std::fs::write(&config_file, "[render]\nheight = 0\n").unwrap();

    let context = with_isolated_env(&temp_dir, || {
        RunContext::new(temp_dir.path().to_path_buf(), Some(config_file.clone()))
    })
    .unwrap();

    let shown = context
        .execute(&Commands::Config {
            command: potplot::cli::ConfigCommands::Show,
        })
        .unwrap();
    assert!(shown.success);
    assert!(shown.text.contains("base_url = \"http://localhost:8080/api\""));

    let validated = context
        .execute(&Commands::Config {
            command: potplot::cli::ConfigCommands::Validate,
        })
        .unwrap();
    assert!(!validated.success);
    assert!(validated.text.contains("height must be greater than zero"));
}

#[test]
fn test_environment_name_must_not_escape_config_dir() {
    let temp_dir = TempDir::new().unwrap();
    with_isolated_env(&temp_dir, || {
        let workspace = temp_dir.path().join("workspace");
        std::fs::create_dir_all(workspace.join("config")).unwrap();

        std::env::set_var("POTPLOT_ENV", "../secrets");
        let result = ConfigLoader::load(&workspace);
        std::env::remove_var("POTPLOT_ENV");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("POTPLOT_ENV"));
    });
}
