//! Configuration is collected once at startup into an immutable [Config]
//! value and passed explicitly to every component. Sources are the config
//! files (install prefix, then `$HOME`, then the working directory) followed
//! by the process environment; later sources override earlier ones.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{debug, warn};

pub const DEFAULT_SERVER: &str = "localhost:8085";
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
const CONFIG_FILE_NAME: &str = "recc.conf";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: String,
    pub cas_server: String,
    pub action_cache_server: String,
    pub instance: String,
    /// Absolute root under which command paths are rewritten to relative
    /// ones. Defaults to the working directory.
    pub project_root: String,

    pub deps_override: BTreeSet<String>,
    pub deps_directory_override: String,
    pub output_files_override: BTreeSet<String>,
    pub output_directories_override: BTreeSet<String>,

    /// `RECC_DEPS_ENV_<K>`: environment for the local dependency run.
    pub deps_env: BTreeMap<String, String>,
    /// `RECC_REMOTE_ENV_<K>`: environment carried into the remote Command.
    pub remote_env: BTreeMap<String, String>,
    /// `RECC_REMOTE_PLATFORM_<K>`: platform properties for worker selection.
    pub remote_platform: BTreeMap<String, String>,
    /// Ordered `from=to` path prefix rewrites, colon-separated in the
    /// environment.
    pub prefix_replacement: Vec<(String, String)>,

    pub deps_global_paths: bool,
    pub force_remote: bool,
    pub skip_cache: bool,
    pub action_uncacheable: bool,
    pub dont_save_output: bool,
    pub verbose: bool,
    pub server_ssl: bool,
    pub server_auth_googleapi: bool,
    pub server_jwt: bool,

    pub jwt_json_file_path: String,
    pub auth_refresh_url: String,

    pub retry_limit: u32,
    pub retry_delay_ms: u64,
    pub max_concurrent_jobs: usize,

    pub tmpdir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: String::new(),
            cas_server: String::new(),
            action_cache_server: String::new(),
            instance: String::new(),
            project_root: String::new(),
            deps_override: BTreeSet::new(),
            deps_directory_override: String::new(),
            output_files_override: BTreeSet::new(),
            output_directories_override: BTreeSet::new(),
            deps_env: BTreeMap::new(),
            remote_env: BTreeMap::new(),
            remote_platform: BTreeMap::new(),
            prefix_replacement: Vec::new(),
            deps_global_paths: false,
            force_remote: false,
            skip_cache: false,
            action_uncacheable: false,
            dont_save_output: false,
            verbose: false,
            server_ssl: false,
            server_auth_googleapi: false,
            server_jwt: false,
            jwt_json_file_path: String::from("~/.recc/jwt.json"),
            auth_refresh_url: String::new(),
            retry_limit: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            tmpdir: String::from("/tmp"),
        }
    }
}

impl Config {
    /// Loads configuration files and the environment, applies defaults, and
    /// logs the warnings for required-but-unset variables.
    pub fn load() -> Config {
        let mut vars: Vec<(String, String)> = Vec::new();
        for location in config_file_locations() {
            match std::fs::read_to_string(&location) {
                Ok(contents) => {
                    debug!(path = %location.display(), "found recc config");
                    vars.extend(parse_config_file(&contents));
                }
                Err(_) => continue,
            }
        }
        vars.extend(std::env::vars());

        let mut config = Config::from_vars(vars);
        config.apply_special_defaults();
        config
    }

    /// Applies a list of `(key, value)` pairs in order; later pairs win.
    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Config {
        let mut c = Config::default();
        for (key, value) in vars {
            match key.as_str() {
                "RECC_SERVER" => c.server = value,
                "RECC_CAS_SERVER" => c.cas_server = value,
                "RECC_ACTION_CACHE_SERVER" => c.action_cache_server = value,
                "RECC_INSTANCE" => c.instance = value,
                "RECC_PROJECT_ROOT" => c.project_root = value,
                "RECC_DEPS_DIRECTORY_OVERRIDE" => c.deps_directory_override = value,
                "RECC_JWT_JSON_FILE_PATH" => c.jwt_json_file_path = value,
                "RECC_AUTH_REFRESH_URL" => c.auth_refresh_url = value,
                "TMPDIR" => {
                    if !value.is_empty() {
                        c.tmpdir = value
                    }
                }

                "RECC_DEPS_GLOBAL_PATHS" => c.deps_global_paths = parse_bool(&value),
                "RECC_FORCE_REMOTE" => c.force_remote = parse_bool(&value),
                "RECC_SKIP_CACHE" => c.skip_cache = parse_bool(&value),
                "RECC_ACTION_UNCACHEABLE" => c.action_uncacheable = parse_bool(&value),
                "RECC_DONT_SAVE_OUTPUT" => c.dont_save_output = parse_bool(&value),
                "RECC_VERBOSE" => c.verbose = parse_bool(&value),
                "RECC_SERVER_SSL" => c.server_ssl = parse_bool(&value),
                "RECC_SERVER_AUTH_GOOGLEAPI" => c.server_auth_googleapi = parse_bool(&value),
                "RECC_SERVER_JWT" => c.server_jwt = parse_bool(&value),

                "RECC_RETRY_LIMIT" => c.retry_limit = value.parse().unwrap_or(c.retry_limit),
                "RECC_RETRY_DELAY" => {
                    c.retry_delay_ms = value.parse().unwrap_or(c.retry_delay_ms)
                }
                "RECC_MAX_CONCURRENT_JOBS" => {
                    c.max_concurrent_jobs = value.parse().unwrap_or(c.max_concurrent_jobs)
                }

                "RECC_DEPS_OVERRIDE" => c.deps_override = parse_set(&value),
                "RECC_OUTPUT_FILES_OVERRIDE" => c.output_files_override = parse_set(&value),
                "RECC_OUTPUT_DIRECTORIES_OVERRIDE" => {
                    c.output_directories_override = parse_set(&value)
                }
                "RECC_PREFIX_REPLACEMENT" => c.prefix_replacement = parse_prefix_map(&value),

                _ => {
                    if let Some(name) = key.strip_prefix("RECC_DEPS_ENV_") {
                        c.deps_env.insert(name.to_string(), value);
                    } else if let Some(name) = key.strip_prefix("RECC_REMOTE_ENV_") {
                        c.remote_env.insert(name.to_string(), value);
                    } else if let Some(name) = key.strip_prefix("RECC_REMOTE_PLATFORM_") {
                        c.remote_platform.insert(name.to_string(), value);
                    }
                }
            }
        }
        c
    }

    fn apply_special_defaults(&mut self) {
        if self.server.is_empty() {
            self.server = DEFAULT_SERVER.to_string();
            warn!(
                "no RECC_SERVER environment variable specified, using default server ({})",
                self.server
            );
        }
        if self.cas_server.is_empty() {
            self.cas_server = self.server.clone();
        }
        if self.action_cache_server.is_empty() {
            self.action_cache_server = self.cas_server.clone();
        }
        if self.project_root.is_empty() {
            if let Ok(cwd) = std::env::current_dir() {
                self.project_root = cwd.to_string_lossy().into_owned();
            }
        }
    }
}

fn parse_bool(value: &str) -> bool {
    !value.is_empty()
}

fn parse_set(value: &str) -> BTreeSet<String> {
    value.split(',').map(str::to_string).collect()
}

/// `RECC_PREFIX_REPLACEMENT=/from1=/to1:/from2=/to2`, applied in order.
fn parse_prefix_map(value: &str) -> Vec<(String, String)> {
    value
        .split(':')
        .filter_map(|pair| {
            let (from, to) = pair.split_once('=')?;
            if from.starts_with('/') && to.starts_with('/') {
                Some((from.to_string(), to.to_string()))
            } else {
                warn!(pair, "ignoring non-absolute prefix replacement");
                None
            }
        })
        .collect()
}

/// Candidate config files, in parse order (least specific first, so that the
/// working directory's file overrides `$HOME`'s, which overrides the
/// installation's).
fn config_file_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(prefix) = option_env!("RECC_INSTALL_PREFIX") {
        locations.push(PathBuf::from(prefix).join("etc/recc").join(CONFIG_FILE_NAME));
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            locations.push(PathBuf::from(home).join(".recc").join(CONFIG_FILE_NAME));
        }
    }
    locations.push(PathBuf::from("recc").join(CONFIG_FILE_NAME));
    locations
}

/// Parses `key=value` lines into environment-style pairs. Keys are
/// upper-cased and prefixed with `RECC_` (except `TMPDIR`), so a file line
/// `server=localhost:8085` configures `RECC_SERVER`.
fn parse_config_file(contents: &str) -> Vec<(String, String)> {
    let mut vars = Vec::new();
    for line in contents.lines() {
        if line.is_empty() || line.starts_with(char::is_whitespace) || line.starts_with('#') {
            continue;
        }
        let stripped: String = line.chars().filter(|c| *c != ' ').collect();
        let Some((key, value)) = stripped.split_once('=') else {
            continue;
        };
        let mut key = key.to_uppercase();
        if key != "TMPDIR" {
            key = format!("RECC_{}", key);
        }
        vars.push((key, value.to_string()));
    }
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(vars: &[(&str, &str)]) -> Config {
        Config::from_vars(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn string_and_int_vars() {
        let c = cfg(&[
            ("RECC_SERVER", "remote:8085"),
            ("RECC_INSTANCE", "main"),
            ("RECC_RETRY_LIMIT", "2"),
            ("RECC_RETRY_DELAY", "10"),
            ("RECC_MAX_CONCURRENT_JOBS", "8"),
        ]);
        assert_eq!(c.server, "remote:8085");
        assert_eq!(c.instance, "main");
        assert_eq!(c.retry_limit, 2);
        assert_eq!(c.retry_delay_ms, 10);
        assert_eq!(c.max_concurrent_jobs, 8);
    }

    #[test]
    fn booleans_are_true_iff_value_nonempty() {
        assert!(cfg(&[("RECC_FORCE_REMOTE", "1")]).force_remote);
        assert!(cfg(&[("RECC_FORCE_REMOTE", "yes")]).force_remote);
        assert!(!cfg(&[("RECC_FORCE_REMOTE", "")]).force_remote);
        assert!(!cfg(&[]).force_remote);
    }

    #[test]
    fn later_values_override_earlier_ones() {
        let c = cfg(&[("RECC_SERVER", "from-file:1"), ("RECC_SERVER", "from-env:2")]);
        assert_eq!(c.server, "from-env:2");
    }

    #[test]
    fn map_vars_accumulate() {
        let c = cfg(&[
            ("RECC_REMOTE_ENV_PATH", "/usr/bin"),
            ("RECC_REMOTE_ENV_LANG", "C"),
            ("RECC_REMOTE_PLATFORM_OSFamily", "linux"),
            ("RECC_DEPS_ENV_LC_ALL", "C"),
        ]);
        assert_eq!(c.remote_env.get("PATH").unwrap(), "/usr/bin");
        assert_eq!(c.remote_env.get("LANG").unwrap(), "C");
        assert_eq!(c.remote_platform.get("OSFamily").unwrap(), "linux");
        assert_eq!(c.deps_env.get("LC_ALL").unwrap(), "C");
    }

    #[test]
    fn comma_lists() {
        let c = cfg(&[("RECC_DEPS_OVERRIDE", "a.h,b.h,sub/c.h")]);
        assert_eq!(
            c.deps_override.iter().cloned().collect::<Vec<_>>(),
            vec!["a.h", "b.h", "sub/c.h"]
        );
    }

    #[test]
    fn prefix_replacement_pairs() {
        let c = cfg(&[("RECC_PREFIX_REPLACEMENT", "/usr/local=/opt:/home=/users")]);
        assert_eq!(
            c.prefix_replacement,
            vec![
                ("/usr/local".to_string(), "/opt".to_string()),
                ("/home".to_string(), "/users".to_string()),
            ]
        );
        // Relative entries are dropped.
        let c = cfg(&[("RECC_PREFIX_REPLACEMENT", "rel=/abs")]);
        assert!(c.prefix_replacement.is_empty());
    }

    #[test]
    fn config_file_lines_are_normalized() {
        let vars = parse_config_file(
            "server=localhost:8085\n\
             # a comment\n\
             \n\
             instance = dev\n\
             tmpdir=/var/tmp\n",
        );
        assert_eq!(
            vars,
            vec![
                ("RECC_SERVER".to_string(), "localhost:8085".to_string()),
                ("RECC_INSTANCE".to_string(), "dev".to_string()),
                ("TMPDIR".to_string(), "/var/tmp".to_string()),
            ]
        );
    }

    #[test]
    fn cas_and_action_cache_fall_back_to_server() {
        let mut c = cfg(&[("RECC_SERVER", "s:1")]);
        c.apply_special_defaults();
        assert_eq!(c.cas_server, "s:1");
        assert_eq!(c.action_cache_server, "s:1");

        let mut c = cfg(&[("RECC_SERVER", "s:1"), ("RECC_CAS_SERVER", "c:2")]);
        c.apply_special_defaults();
        assert_eq!(c.cas_server, "c:2");
        assert_eq!(c.action_cache_server, "c:2");
    }
}
