use std::path::PathBuf;

use clap::{Parser, Subcommand};

use relo_core::config::DownloaderType;

/// Move torrents from one tracker domain to another in bulk, on a
/// qBittorrent or Transmission instance.
#[derive(Parser, Debug)]
#[command(name = "relo", version, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print info-level logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the download client is reachable and the login works
    Test,

    /// List tracker domains in use, with how many torrents use each
    Trackers,

    /// Preview which tracker URLs the enabled rules would rewrite
    Scan {
        /// List every affected tracker URL
        #[arg(long)]
        details: bool,
    },

    /// Scan, confirm, then rewrite the matching tracker URLs
    Replace {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// List every affected tracker URL before confirming
        #[arg(long)]
        details: bool,
    },

    /// Show or edit replacement rules
    Rules {
        #[command(subcommand)]
        action: RulesCommand,
    },

    /// Show or edit connection settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Print all rules with their numbers
    List,

    /// Add a rule for OLD, filling the blank rule if there is one
    Add {
        /// Domain to replace
        old: String,
        /// Replacement domain
        new: Option<String>,
    },

    /// Delete rule number INDEX
    Remove { index: usize },

    /// Change fields of rule number INDEX
    Set {
        index: usize,

        #[arg(long, value_name = "DOMAIN")]
        old: Option<String>,

        #[arg(long, value_name = "DOMAIN")]
        new: Option<String>,

        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,
    },

    /// Add a rule for a tracker domain currently in use
    Pick { domain: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the connection settings (password masked)
    Show,

    /// Change connection settings. Changing --client or --https resets the
    /// port to its default unless --port is also given.
    Set {
        /// qbittorrent or transmission
        #[arg(long)]
        client: Option<DownloaderType>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long, value_name = "BOOL")]
        https: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replace_with_global_config() {
        let cli = Cli::try_parse_from(["relo", "replace", "--yes", "--config", "/tmp/relo.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/relo.toml")));
        assert!(matches!(
            cli.command,
            Command::Replace {
                yes: true,
                details: false
            }
        ));
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "relo",
            "config",
            "set",
            "--client",
            "transmission",
            "--https",
            "true",
        ])
        .unwrap();
        let Command::Config {
            action: ConfigCommand::Set { client, https, port, .. },
        } = cli.command
        else {
            panic!("expected config set");
        };
        assert_eq!(client, Some(DownloaderType::Transmission));
        assert_eq!(https, Some(true));
        assert_eq!(port, None);
    }

    #[test]
    fn test_unknown_client_rejected() {
        assert!(Cli::try_parse_from(["relo", "config", "set", "--client", "deluge"]).is_err());
    }

    #[test]
    fn test_enable_conflicts_with_disable() {
        assert!(
            Cli::try_parse_from(["relo", "rules", "set", "1", "--enable", "--disable"]).is_err()
        );
    }

    #[test]
    fn test_rules_add_new_is_optional() {
        let cli = Cli::try_parse_from(["relo", "rules", "add", "old.example.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Rules {
                action: RulesCommand::Add { new: None, .. }
            }
        ));
    }
}
