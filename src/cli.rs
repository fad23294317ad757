//! Command-line flags shared by both binaries.

use crate::logger;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Level forced by `-v` flags; `None` defers to config / `RUST_LOG`.
    pub log_level: Option<&'static str>,
    pub config_path: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(CliArgs),
    Help,
}

pub fn usage(bin: &str) -> String {
    format!(
        "Usage: {bin} [OPTIONS]\n\n\
         Options:\n  \
           -h, --help                 Print help\n  \
           -f, --config <PATH>        Path to configuration file (default: config/default.toml)\n  \
           -v, -vv, -vvv, -vvvv       Increase logging verbosity"
    )
}

pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Parsed, String> {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-f" | "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => return Err("-f/--config requires a path argument".to_string()),
            },
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.len() > 1 && a.starts_with('-') && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => return Err(format!("unexpected argument: '{other}'")),
        }
    }

    Ok(Parsed::Run(CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_defers_to_config() {
        assert_eq!(parse(args(&[])), Ok(Parsed::Run(CliArgs::default())));
    }

    #[test]
    fn verbosity_stacks() {
        let Ok(Parsed::Run(a)) = parse(args(&["-vv", "-v"])) else { panic!("expected run") };
        assert_eq!(a.log_level, Some("debug"));
    }

    #[test]
    fn config_path_is_taken() {
        let Ok(Parsed::Run(a)) = parse(args(&["--config", "alt.toml"])) else { panic!("expected run") };
        assert_eq!(a.config_path.as_deref(), Some("alt.toml"));
    }

    #[test]
    fn config_flag_without_value_errors() {
        assert!(parse(args(&["-f"])).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(args(&["-v", "-h", "--bogus"])), Ok(Parsed::Help));
    }

    #[test]
    fn unknown_flag_errors() {
        assert!(parse(args(&["--bogus"])).unwrap_err().contains("--bogus"));
    }

    #[test]
    fn usage_names_binary() {
        assert!(usage("db-probe").starts_with("Usage: db-probe"));
    }
}
