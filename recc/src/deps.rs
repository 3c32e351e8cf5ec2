//! Local dependency discovery: runs the compiler's own dependency-listing
//! mode as a subprocess and parses the resulting make rules into the set of
//! input files the command reads.

use std::collections::{BTreeMap, BTreeSet};
use std::process::Stdio;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::parser::ParsedCommand;
use crate::pathutil;

pub struct SubprocessResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Runs a command to completion, capturing both output streams. `extra_env`
/// entries are layered over the inherited environment.
pub async fn execute(
    command: &[String],
    extra_env: &BTreeMap<String, String>,
    working_directory: Option<&str>,
) -> Result<SubprocessResult> {
    let (program, rest) = command
        .split_first()
        .ok_or_else(|| Error::Usage("cannot execute an empty command".into()))?;

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(rest)
        .envs(extra_env)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = working_directory {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await?;
    Ok(SubprocessResult {
        exit_code: output.status.code().unwrap_or(1),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Parses make-style dependency rules into the set of files they mention.
///
/// In the default format, targets before `:` are skipped, `\`-newline
/// continuations are joined, and `\ ` escapes a space inside a filename. In
/// the Sun format each line after the target holds exactly one unescaped
/// dependency. When `include_global_paths` is false, dependencies starting
/// with `/` (system headers) are dropped.
pub fn dependencies_from_make_rules(
    rules: &str,
    is_sun_format: bool,
    include_global_paths: bool,
) -> BTreeSet<String> {
    if is_sun_format {
        return dependencies_from_sun_rules(rules, include_global_paths);
    }

    let mut result = BTreeSet::new();
    let mut saw_colon_on_line = false;
    let mut saw_backslash = false;
    let mut ignoring_file = false;
    let mut current = String::new();

    for character in rules.chars() {
        if saw_backslash {
            saw_backslash = false;
            if character != '\n' && !ignoring_file && saw_colon_on_line {
                current.push(character);
            }
        } else {
            match character {
                '\\' => saw_backslash = true,
                ':' if !saw_colon_on_line => saw_colon_on_line = true,
                '\n' => {
                    saw_colon_on_line = false;
                    ignoring_file = false;
                    if !current.is_empty() {
                        result.insert(std::mem::take(&mut current));
                    }
                }
                ' ' => {
                    ignoring_file = false;
                    if !current.is_empty() {
                        result.insert(std::mem::take(&mut current));
                    }
                }
                '/' if current.is_empty() && !include_global_paths => {
                    ignoring_file = true;
                }
                _ => {
                    if !ignoring_file && saw_colon_on_line {
                        current.push(character);
                    }
                }
            }
        }
    }
    if !current.is_empty() {
        result.insert(current);
    }
    result
}

/// Sun's `-xM1` output carries one dependency per line with no escaping; a
/// `target:` prefix (present at least on the first line) is stripped.
fn dependencies_from_sun_rules(rules: &str, include_global_paths: bool) -> BTreeSet<String> {
    rules
        .lines()
        .map(|line| match line.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => line.trim(),
        })
        .filter(|dep| !dep.is_empty())
        .filter(|dep| include_global_paths || !dep.starts_with('/'))
        .map(str::to_string)
        .collect()
}

/// Output locations a compile plausibly writes when the command line doesn't
/// declare any: `a.out` plus object/precompiled-header/depfile names derived
/// from each dependency.
pub fn guess_products(deps: &BTreeSet<String>) -> BTreeSet<String> {
    const SUFFIXES: [&str; 3] = [".o", ".gch", ".d"];

    let mut result: BTreeSet<String> = BTreeSet::new();
    result.insert("a.out".to_string());
    for dep in deps {
        let stem = dep.rfind('.').map(|i| &dep[..i]).unwrap_or(dep);
        let stem = stem.rsplit('/').next().unwrap_or(stem);
        for suffix in SUFFIXES {
            result.insert(format!("{}{}", stem, suffix));
            result.insert(format!("{}{}", dep, suffix));
        }
    }
    result
}

pub struct CommandFileInfo {
    pub dependencies: BTreeSet<String>,
    pub possible_products: BTreeSet<String>,
}

/// Runs the dependency-discovery command for `parsed` and returns the files
/// it reads, plus the normalized set of products it plausibly writes.
#[instrument(skip_all)]
pub async fn get_file_info(parsed: &ParsedCommand, config: &Config) -> Result<CommandFileInfo> {
    let command = parsed.dependencies_command();
    let result = execute(command, &config.deps_env, None).await?;
    if result.exit_code != 0 {
        debug!(
            exit_code = result.exit_code,
            command = ?command,
            stderr = %String::from_utf8_lossy(&result.stderr),
            "dependency discovery failed"
        );
        return Err(Error::SubprocessFailed {
            exit_code: result.exit_code,
        });
    }

    // On AIX the rules land in a temporary file rather than on stdout.
    let rules = match parsed.aix_deps_file_path() {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => String::from_utf8_lossy(&result.stdout).into_owned(),
    };

    let dependencies = dependencies_from_make_rules(
        &rules,
        parsed.produces_sun_make_rules(),
        config.deps_global_paths,
    );

    let products = if parsed.products().is_empty() {
        guess_products(&dependencies)
    } else {
        parsed.products().clone()
    };

    Ok(CommandFileInfo {
        dependencies,
        possible_products: products.iter().map(|p| pathutil::normalize(p)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case::simple("foo.o: foo.c foo.h\n", &["foo.c", "foo.h"])]
    #[case::continuations_joined("foo.o: foo.c \\\n  foo.h bar.h\n", &["foo.c", "foo.h", "bar.h"])]
    #[case::escaped_space_kept("out.o: has\\ space.c plain.h\n", &["has space.c", "plain.h"])]
    #[case::no_trailing_newline("foo.o: foo.c", &["foo.c"])]
    #[case::multiple_rules("a.o: a.c\nb.o: b.c b.h\n", &["a.c", "b.c", "b.h"])]
    fn make_rule_parsing(#[case] rules: &str, #[case] want: &[&str]) {
        assert_eq!(dependencies_from_make_rules(rules, false, true), set(want));
    }

    #[test]
    fn global_paths_are_filtered_unless_requested() {
        let rules = "foo.o: foo.c /usr/include/stdio.h\n";
        assert_eq!(
            dependencies_from_make_rules(rules, false, false),
            set(&["foo.c"])
        );
        assert_eq!(
            dependencies_from_make_rules(rules, false, true),
            set(&["foo.c", "/usr/include/stdio.h"])
        );
    }

    #[test]
    fn sun_format_one_dependency_per_line() {
        let deps = dependencies_from_make_rules(
            "foo.o:\n/usr/include/stdio.h\n./foo.h\n",
            true,
            true,
        );
        assert_eq!(deps, set(&["/usr/include/stdio.h", "./foo.h"]));
    }

    #[test]
    fn sun_format_keeps_unescaped_spaces() {
        let deps = dependencies_from_make_rules("foo.o:\nwith space.h\n", true, true);
        assert_eq!(deps, set(&["with space.h"]));
    }

    #[test]
    fn guessed_products_cover_stems_and_deps() {
        let products = guess_products(&set(&["src/foo.cpp"]));
        assert!(products.contains("a.out"));
        assert!(products.contains("foo.o"));
        assert!(products.contains("foo.gch"));
        assert!(products.contains("foo.d"));
        assert!(products.contains("src/foo.cpp.o"));
    }

    #[tokio::test]
    async fn subprocess_captures_output_and_status() {
        let result = execute(
            &["sh".to_string(), "-c".to_string(), "echo out; echo err >&2; exit 3".to_string()],
            &BTreeMap::new(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(String::from_utf8_lossy(&result.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&result.stderr), "err\n");
    }

    #[tokio::test]
    async fn subprocess_env_injection() {
        let mut env = BTreeMap::new();
        env.insert("RECC_TEST_MARKER".to_string(), "42".to_string());
        let result = execute(
            &["sh".to_string(), "-c".to_string(), "echo $RECC_TEST_MARKER".to_string()],
            &env,
            None,
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8_lossy(&result.stdout).trim(), "42");
    }
}
