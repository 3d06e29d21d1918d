// Configuration resolver: turns the startup arguments into an immutable
// `RuntimeConfig`. The harness takes no config files or environment
// variables, so the command line is the only source.

use crate::error::{HarnessError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Usage text printed for `-h`, `/?` and on argument errors.
pub const USAGE: &str = "
Vending Machine Test Harness
----------------------------

vending-harness
Usage [-p      Port Number]       # Port number of the listening Vending Machine service
      [--port             ]
      [-t                 ]       # Timeout value for API calls, in seconds (default 5)
      [--timeout          ]
      [-h | /?            ]       # Show this help";

/// Settings shared by every action for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RuntimeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Root of the vending machine API on the local host.
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}/vendingmachine/v1", self.port)
    }
}

/// What the process should do once the arguments are read.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    Run(RuntimeConfig),
    Help,
}

/// Resolve the argument tokens (program name excluded).
///
/// Scanning stops at the first bad token and the error carries its
/// 1-based position. A flag with no value reports the flag's own
/// position; an unparsable value reports the value's position.
pub fn resolve<I, S>(args: I) -> Result<Resolution>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    let mut config = RuntimeConfig::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !flag.starts_with('-') && !flag.starts_with('/') {
            return Err(HarnessError::Argument { index: i + 1 });
        }

        match flag {
            "-p" | "--port" => {
                config.port = value_after(&args, i)?;
                i += 2;
            }
            "-t" | "--timeout" => {
                let timeout: u64 = value_after(&args, i)?;
                if timeout == 0 {
                    return Err(HarnessError::Argument { index: i + 2 });
                }
                config.timeout_secs = timeout;
                i += 2;
            }
            "-h" | "--help" | "/?" => return Ok(Resolution::Help),
            _ => return Err(HarnessError::Argument { index: i + 1 }),
        }
    }

    log::debug!("resolved configuration: {:?}", config);
    Ok(Resolution::Run(config))
}

fn value_after<T: FromStr>(args: &[String], flag: usize) -> Result<T> {
    let value = args
        .get(flag + 1)
        .ok_or(HarnessError::Argument { index: flag + 1 })?;
    value
        .trim()
        .parse()
        .map_err(|_| HarnessError::Argument { index: flag + 2 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_index(args: &[&str]) -> usize {
        match resolve(args) {
            Err(HarnessError::Argument { index }) => index,
            other => panic!("expected argument error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn port_and_timeout_are_read() {
        let res = resolve(["-p", "8080", "-t", "3"]).unwrap();
        assert_eq!(
            res,
            Resolution::Run(RuntimeConfig {
                port: 8080,
                timeout_secs: 3
            })
        );
    }

    #[test]
    fn long_flags_are_accepted() {
        let res = resolve(["--timeout", "12", "--port", "9000"]).unwrap();
        assert_eq!(
            res,
            Resolution::Run(RuntimeConfig {
                port: 9000,
                timeout_secs: 12
            })
        );
    }

    #[test]
    fn timeout_defaults_to_five_seconds() {
        for port in [1u16, 80, 8080, 65535] {
            let port_arg = port.to_string();
            match resolve(["-p", port_arg.as_str()]).unwrap() {
                Resolution::Run(cfg) => {
                    assert_eq!(cfg.port, port);
                    assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
                }
                Resolution::Help => panic!("unexpected help"),
            }
        }
    }

    #[test]
    fn empty_arguments_use_defaults() {
        let empty: [&str; 0] = [];
        assert_eq!(
            resolve(empty).unwrap(),
            Resolution::Run(RuntimeConfig::default())
        );
    }

    #[test]
    fn help_flags_stop_processing() {
        assert_eq!(resolve(["-h"]).unwrap(), Resolution::Help);
        assert_eq!(resolve(["/?"]).unwrap(), Resolution::Help);
        // Anything after help is never looked at.
        assert_eq!(resolve(["-h", "garbage"]).unwrap(), Resolution::Help);
    }

    #[test]
    fn non_numeric_value_reports_value_position() {
        assert_eq!(error_index(&["-p", "abc"]), 2);
        assert_eq!(error_index(&["-p", "8080", "-t", "soon"]), 4);
        assert_eq!(error_index(&["-p", "70000"]), 2);
    }

    #[test]
    fn missing_value_reports_flag_position() {
        assert_eq!(error_index(&["-p"]), 1);
        assert_eq!(error_index(&["-p", "8080", "--timeout"]), 3);
    }

    #[test]
    fn token_without_flag_prefix_is_rejected() {
        assert_eq!(error_index(&["8080"]), 1);
        assert_eq!(error_index(&["-p", "8080", "extra"]), 3);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_eq!(error_index(&["-x"]), 1);
        assert_eq!(error_index(&["-t", "4", "/port"]), 3);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert_eq!(error_index(&["-t", "0"]), 2);
    }

    #[test]
    fn base_url_targets_localhost() {
        let cfg = RuntimeConfig {
            port: 8081,
            timeout_secs: 5,
        };
        assert_eq!(cfg.base_url(), "http://localhost:8081/vendingmachine/v1");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }
}
