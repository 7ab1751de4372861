use clap::Subcommand;

use crate::shared::config::Config;

/// Configuration management commands.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print JSON Schema for the configuration file
    Schema,

    /// Print the effective configuration (file values merged over defaults)
    Show,
}

impl ConfigCommands {
    pub fn run(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Schema => {
                let schema = crate::shared::config::generate_schema();
                let json = serde_json::to_string_pretty(&schema)?;
                println!("{json}");
            }
            Self::Show => print!("{}", render_config(config)?),
        }
        Ok(())
    }
}

fn render_config(config: &Config) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
