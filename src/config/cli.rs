use crate::config::toml_config::HerdConfig;
use crate::domain::model::Sex;
use crate::utils::error::{HerdError, Result};
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "herdbook")]
#[command(about = "Browse a herd book: paged listings and ancestry lookups")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Herd file (.csv or .json), overrides storage.herd_file
    #[arg(long)]
    pub herd_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List animals one page at a time
    List {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,

        /// Only animals of this sex (M or F)
        #[arg(long)]
        sex: Option<Sex>,
    },
    /// Show a single animal
    Show { id: u64 },
    /// Show an animal together with all of its recorded ancestors
    Lineage { id: u64 },
}

impl CliConfig {
    /// 合併設定檔與命令列參數
    pub fn resolve(&self) -> Result<HerdConfig> {
        let mut config = match (&self.config, &self.herd_file) {
            (Some(path), _) => HerdConfig::from_file(path)?,
            (None, Some(herd_file)) => HerdConfig::for_herd_file(herd_file),
            (None, None) => {
                return Err(HerdError::MissingConfigError {
                    field: "--config or --herd-file".to_string(),
                })
            }
        };

        if let Some(herd_file) = &self.herd_file {
            config.storage.herd_file = herd_file.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// `--verbose` 優先，否則用設定檔的 `[logging] level`
    pub fn effective_log_level<'a>(&self, config: &'a HerdConfig) -> &'a str {
        if self.verbose {
            "debug"
        } else {
            config.log_level()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = CliConfig::parse_from([
            "herdbook",
            "--herd-file",
            "herd.csv",
            "list",
            "--page",
            "2",
            "--page-size",
            "5",
            "--sex",
            "F",
        ]);

        match cli.command {
            Command::List {
                page,
                page_size,
                sex,
            } => {
                assert_eq!(page, 2);
                assert_eq!(page_size, Some(5));
                assert_eq!(sex, Some(Sex::Female));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_sex() {
        let result =
            CliConfig::try_parse_from(["herdbook", "--herd-file", "h.csv", "list", "--sex", "X"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_requires_a_source() {
        let cli = CliConfig::parse_from(["herdbook", "lineage", "3"]);
        assert!(matches!(
            cli.resolve(),
            Err(HerdError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_resolve_from_herd_file_flag() {
        let cli = CliConfig::parse_from(["herdbook", "--herd-file", "herd.json", "show", "1"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.herd_file(), "herd.json");
        assert_eq!(config.max_page_size(), 50);
    }

    #[test]
    fn test_log_level_follows_config_unless_verbose() {
        let config = HerdConfig::from_toml_str(
            "[storage]\nherd_file = \"herd.csv\"\n\n[logging]\nlevel = \"warn\"\n",
        )
        .unwrap();

        let quiet = CliConfig::parse_from(["herdbook", "--herd-file", "herd.csv", "show", "1"]);
        assert_eq!(quiet.effective_log_level(&config), "warn");

        let verbose =
            CliConfig::parse_from(["herdbook", "--herd-file", "herd.csv", "-v", "show", "1"]);
        assert_eq!(verbose.effective_log_level(&config), "debug");

        let defaults = HerdConfig::for_herd_file("herd.csv");
        assert_eq!(quiet.effective_log_level(&defaults), "info");
    }
}
