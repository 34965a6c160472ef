//! Command-line interface

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::reference::{LookupError, ReferenceService};
use crate::tui::app::StartupAction;
use crate::tui::ui::truncate_string;

#[derive(Parser, Debug)]
#[command(name = "cadastro")]
#[command(about = "Register people with postal-code autofill and IBGE state/municipality lookups")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Run in CLI mode (print output and exit, no interactive TUI)
    #[arg(long, global = true)]
    pub cli: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the Brazilian states
    States,
    /// List the municipalities of a state
    Cities {
        /// State abbreviation, e.g. SP
        uf: String,
    },
    /// Look up the address of a postal code (CEP)
    Cep {
        /// Eight digits, with or without the dash
        code: String,
    },
}

impl Commands {
    /// What the TUI should open with when started with this command
    pub fn startup_action(&self) -> StartupAction {
        match self {
            Commands::States => StartupAction::NewForm,
            Commands::Cities { uf } => StartupAction::NewFormForState(uf.clone()),
            Commands::Cep { code } => StartupAction::NewFormForPostalCode(code.clone()),
        }
    }
}

/// Run a command against the reference services and print the result
pub async fn run_command<W: Write>(
    command: &Commands,
    service: &dyn ReferenceService,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::States => {
            let states = service.list_states().await.context("Failed to list states")?;
            writeln!(out, "{:<4} {:<6} {}", "ID", "UF", "Name")?;
            writeln!(out, "{}", "-".repeat(40))?;
            for state in &states {
                writeln!(out, "{:<4} {:<6} {}", state.id, state.abbreviation, state.name)?;
            }
            writeln!(out)?;
            writeln!(out, "Total: {} states", states.len())?;
        }
        Commands::Cities { uf } => {
            let code = uf.trim().to_uppercase();
            let states = service.list_states().await.context("Failed to list states")?;
            let state = states
                .iter()
                .find(|s| s.abbreviation == code)
                .ok_or_else(|| LookupError::NotFound(format!("state {}", code)))?;

            let cities = service
                .list_cities(state.id)
                .await
                .with_context(|| format!("Failed to list municipalities for {}", code))?;
            writeln!(out, "Municipalities of {}", state.label())?;
            writeln!(out, "{:<9} {}", "ID", "Name")?;
            writeln!(out, "{}", "-".repeat(40))?;
            for city in &cities {
                writeln!(out, "{:<9} {}", city.id, truncate_string(&city.name, 60))?;
            }
            writeln!(out)?;
            writeln!(out, "Total: {} municipalities", cities.len())?;
        }
        Commands::Cep { code } => {
            let address = service
                .lookup_postal_code(code)
                .await
                .with_context(|| format!("Failed to look up postal code {}", code))?;
            writeln!(out, "Postal code:  {}", code)?;
            writeln!(out, "Street:       {}", address.street_address)?;
            writeln!(out, "Neighborhood: {}", address.neighborhood)?;
            writeln!(out, "Municipality: {}", address.city)?;
            writeln!(out, "State:        {}", address.state_code)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockReferenceService;

    async fn run_to_string(command: Commands, service: &MockReferenceService) -> Result<String> {
        let mut out = Vec::new();
        run_command(&command, service, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::parse_from(["cadastro", "--cli", "cities", "sp"]);
        assert!(cli.cli);
        assert_eq!(cli.command, Some(Commands::Cities { uf: "sp".into() }));

        let cli = Cli::parse_from(["cadastro", "cep", "01001-000", "--cli"]);
        assert!(cli.cli);
        assert_eq!(cli.command, Some(Commands::Cep { code: "01001-000".into() }));

        let cli = Cli::parse_from(["cadastro"]);
        assert!(!cli.cli);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_startup_actions() {
        assert_eq!(Commands::States.startup_action(), StartupAction::NewForm);
        assert_eq!(
            Commands::Cep { code: "01001000".into() }.startup_action(),
            StartupAction::NewFormForPostalCode("01001000".into())
        );
    }

    #[tokio::test]
    async fn test_states_command() {
        let service = MockReferenceService::new();
        let output = run_to_string(Commands::States, &service).await.unwrap();
        assert!(output.contains("35   SP     São Paulo"));
        assert!(output.contains("Total: 2 states"));
    }

    #[tokio::test]
    async fn test_cities_command_accepts_lowercase() {
        let service = MockReferenceService::new();
        let output = run_to_string(Commands::Cities { uf: "rj".into() }, &service)
            .await
            .unwrap();
        assert!(output.contains("Municipalities of RJ - Rio de Janeiro"));
        assert!(output.contains("Niterói"));
        assert_eq!(service.calls(), vec!["states".to_string(), "cities:33".to_string()]);
    }

    #[tokio::test]
    async fn test_cities_command_unknown_state() {
        let service = MockReferenceService::new();
        let err = run_to_string(Commands::Cities { uf: "XX".into() }, &service)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("state XX"));
    }

    #[tokio::test]
    async fn test_cep_command() {
        let service = MockReferenceService::new();
        let output = run_to_string(Commands::Cep { code: "01001-000".into() }, &service)
            .await
            .unwrap();
        assert!(output.contains("Street:       Praça da Sé"));
        assert!(output.contains("State:        SP"));

        let err = run_to_string(Commands::Cep { code: "123".into() }, &service)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to look up postal code 123"));
    }
}
