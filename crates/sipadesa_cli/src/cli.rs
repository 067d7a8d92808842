use clap::{Parser, Subcommand};
use sipadesa_core::AgeRule;
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Village population records service",
    long_about = "Serves the SIPADESA records API over HTTP and administers the underlying SQLite store.",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "SIPADESA_DB",
        default_value = "sipadesa.sqlite3",
        value_name = "PATH",
        help = "SQLite database file"
    )]
    pub db: PathBuf,

    #[arg(
        long = "log-dir",
        global = true,
        env = "SIPADESA_LOG_DIR",
        default_value = "logs",
        value_name = "DIR",
        help = "Directory for rolling log files; relative paths resolve against the working directory"
    )]
    pub log_dir: PathBuf,

    #[arg(
        long = "log-level",
        global = true,
        env = "SIPADESA_LOG_LEVEL",
        value_name = "LEVEL",
        help = "trace|debug|info|warn|error (defaults by build mode)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API until Ctrl-C.
    Serve {
        #[arg(
            long,
            env = "SIPADESA_BIND",
            default_value = sipadesa_http::config::DEFAULT_BIND,
            value_name = "ADDR",
            help = "Listen address (host:port)"
        )]
        bind: std::net::SocketAddr,
        #[arg(
            long = "simulated-latency-ms",
            default_value_t = 0u64,
            value_name = "MS",
            help = "Delay added before every storage call"
        )]
        simulated_latency_ms: u64,
        #[arg(long = "age-rule", default_value = "calendar-year", value_parser = parse_age_rule)]
        age_rule: AgeRule,
    },
    /// Load a browser-store snapshot into the database.
    ImportLegacy {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write both collections in the browser-store layout.
    ExportLegacy {
        #[arg(long, short, value_name = "FILE", help = "Write to FILE instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Print dashboard statistics as JSON.
    Stats {
        #[arg(long, value_name = "LABEL", help = "Restrict to one hamlet")]
        hamlet: Option<String>,
        #[arg(long = "age-rule", default_value = "calendar-year", value_parser = parse_age_rule)]
        age_rule: AgeRule,
    },
    /// List accounts with their role and status.
    Users,
    /// Activate a pending account.
    VerifyUser {
        id: String,
        #[arg(long, value_name = "AREA", help = "Work area; required for RT_RW and KADUS")]
        area: Option<String>,
    },
    /// Replace an account's password.
    ResetPassword { id: String, password: String },
}

fn parse_age_rule(value: &str) -> Result<AgeRule, String> {
    AgeRule::parse(value).ok_or_else(|| format!("expected calendar-year|exact, got `{value}`"))
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use sipadesa_core::AgeRule;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["sipadesa", "serve"]).unwrap();
        match cli.cmd {
            Command::Serve {
                bind,
                simulated_latency_ms,
                age_rule,
            } => {
                assert_eq!(bind.to_string(), "127.0.0.1:8080");
                assert_eq!(simulated_latency_ms, 0);
                assert_eq!(age_rule, AgeRule::CalendarYear);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["sipadesa", "stats", "--db", "/tmp/x.db", "--age-rule", "exact"])
                .unwrap();
        assert_eq!(cli.db.to_str(), Some("/tmp/x.db"));
        assert!(matches!(
            cli.cmd,
            Command::Stats {
                age_rule: AgeRule::Exact,
                ..
            }
        ));
    }

    #[test]
    fn unknown_age_rule_is_rejected() {
        assert!(Cli::try_parse_from(["sipadesa", "stats", "--age-rule", "lunar"]).is_err());
    }
}
