//! Assembles the remote Action: gathers the input set, builds the Merkle
//! input root, and constructs the Command and Action protos whose digests
//! key the Action Cache.

use bytes::Bytes;
use prost::Message;
use recc_reapi::remote_execution as re;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::deps;
use crate::digest::Digest;
use crate::errors::{Error, Result};
use crate::merkle::{BlobMap, InputFile, NestedDirectory};
use crate::parser::ParsedCommand;
use crate::pathutil;

/// A fully constructed Action, its digest, and the blob set (inputs,
/// directories, Command, Action) ready for upload.
pub struct ActionBundle {
    pub action: re::Action,
    pub action_digest: Digest,
    pub command: re::Command,
}

/// Builds the Action for `parsed`, filling `blobs` with everything the
/// server will need. Returns `None` when the invocation should fall back to
/// local execution: the command is not a compiler command, dependency
/// discovery failed, or a product lands outside the working tree.
#[instrument(skip_all)]
pub async fn build_action(
    parsed: &ParsedCommand,
    cwd: &str,
    config: &Config,
    blobs: &mut BlobMap,
) -> Result<Option<ActionBundle>> {
    if !parsed.is_compiler_command() && !config.force_remote {
        debug!("not a compiler command, running locally (RECC_FORCE_REMOTE=1 overrides)");
        return Ok(None);
    }

    let mut products = config.output_files_override.clone();
    let mut working_directory = String::new();
    let mut nested = NestedDirectory::default();

    if !config.deps_directory_override.is_empty() {
        debug!(
            directory = %config.deps_directory_override,
            "building input root from directory override"
        );
        nested = crate::merkle::make_nested_directory(
            std::path::Path::new(&config.deps_directory_override),
            config,
            blobs,
        )?;
    } else {
        let mut dependencies = config.deps_override.clone();

        if dependencies.is_empty() && !config.force_remote {
            let file_info = match deps::get_file_info(parsed, config).await {
                Ok(info) => info,
                Err(Error::SubprocessFailed { .. }) => {
                    debug!("dependency discovery failed, running locally to show the error");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            dependencies = file_info.dependencies;
            if config.output_files_override.is_empty()
                && config.output_directories_override.is_empty()
            {
                products = file_info.possible_products;
            }
        }

        // The Merkle working directory needs as many real parent segments
        // of the cwd as the deepest `..` escape among inputs and outputs.
        let parents_needed = dependencies
            .iter()
            .chain(products.iter())
            .map(|p| pathutil::parent_directory_levels(p))
            .max()
            .unwrap_or(0);
        working_directory = pathutil::last_n_segments(cwd, parents_needed as usize)?;

        for dependency in &dependencies {
            let merkle_path = if dependency.starts_with('/') {
                dependency.clone()
            } else {
                format!("{}/{}", working_directory, dependency)
            };
            let merkle_path = pathutil::normalize(&merkle_path);
            let merkle_path =
                pathutil::resolve_prefix_map(&merkle_path, &config.prefix_replacement);

            let local_path = if dependency.starts_with('/') {
                std::path::PathBuf::from(dependency)
            } else {
                std::path::Path::new(cwd).join(dependency)
            };
            let Some(file) = InputFile::from_path(&local_path)? else {
                debug!(path = %dependency, "skipping unsupported dependency");
                continue;
            };
            if !file.is_symlink() {
                blobs.insert(file.digest().clone(), file.contents().clone());
            }
            nested.add(file, &merkle_path);
        }
    }

    if !working_directory.is_empty() {
        nested.add_directory(&working_directory);
    }

    for product in &products {
        if product.starts_with('/') {
            debug!(
                product = %product,
                "command produces a file outside the working tree, running locally \
                 (RECC_OUTPUT_FILES_OVERRIDE overrides)"
            );
            return Ok(None);
        }
    }

    let input_root_digest = nested.to_digest(blobs);

    let command = re::Command {
        arguments: parsed.arguments().to_vec(),
        environment_variables: config
            .remote_env
            .iter()
            .map(|(name, value)| re::EnvironmentVariable {
                name: name.clone(),
                value: value.clone(),
            })
            .collect(),
        output_files: products.iter().cloned().collect(),
        output_directories: config.output_directories_override.iter().cloned().collect(),
        platform: if config.remote_platform.is_empty() {
            None
        } else {
            Some(re::Platform {
                properties: config
                    .remote_platform
                    .iter()
                    .map(|(name, value)| re::Property {
                        name: name.clone(),
                        value: value.clone(),
                    })
                    .collect(),
            })
        },
        // If the cwd itself sits under a replaced prefix, the command's
        // working directory has to be rewritten the same way as the inputs.
        working_directory: pathutil::resolve_prefix_map(
            &working_directory,
            &config.prefix_replacement,
        ),
    };

    let command_encoded = Bytes::from(command.encode_to_vec());
    let command_digest = Digest::of_bytes(&command_encoded);
    blobs.insert(command_digest.clone(), command_encoded);

    let action = re::Action {
        command_digest: Some((&command_digest).into()),
        input_root_digest: Some((&input_root_digest).into()),
        timeout: None,
        do_not_cache: config.action_uncacheable,
    };
    let action_encoded = Bytes::from(action.encode_to_vec());
    let action_digest = Digest::of_bytes(&action_encoded);
    blobs.insert(action_digest.clone(), action_encoded);

    debug!(action = %action_digest, input_root = %input_root_digest, "built action");
    Ok(Some(ActionBundle {
        action,
        action_digest,
        command,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedCommand;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// A project directory with one source file, plus a Config pointing
    /// dependency discovery at an override so no compiler is needed.
    struct Fixture {
        dir: tempfile::TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.cpp"), b"int main(){}\n").unwrap();

        let root = dir.path().to_string_lossy().into_owned();
        let config = Config {
            project_root: root,
            deps_override: ["hello.cpp".to_string()].into_iter().collect(),
            output_files_override: ["hello.o".to_string()].into_iter().collect(),
            ..Config::default()
        };
        Fixture { dir, config }
    }

    async fn build(fixture: &Fixture, argv: &[&str]) -> (Option<ActionBundle>, BlobMap) {
        let cwd = fixture.dir.path().to_string_lossy().into_owned();
        let parsed = ParsedCommand::parse(&args(argv), &cwd, &fixture.config).unwrap();

        let mut blobs = BlobMap::new();
        let bundle = build_action(&parsed, &cwd, &fixture.config, &mut blobs)
            .await
            .unwrap();
        (bundle, blobs)
    }

    #[tokio::test]
    async fn non_compiler_commands_fall_back_locally() {
        let fixture = fixture();
        let (bundle, _) = build(&fixture, &["ls", "-l"]).await;
        assert!(bundle.is_none());
    }

    #[tokio::test]
    async fn builds_action_and_uploadable_blobs() {
        let fixture = fixture();
        let (bundle, blobs) = build(&fixture, &["gcc", "-c", "hello.cpp", "-o", "hello.o"]).await;
        let bundle = bundle.unwrap();

        assert_eq!(bundle.command.arguments[0], "gcc");
        assert_eq!(bundle.command.output_files, vec!["hello.o".to_string()]);
        assert!(!bundle.action.do_not_cache);

        // Blob map holds the source file, the input root, the Command and
        // the Action.
        assert!(blobs.contains_key(&Digest::of_bytes(b"int main(){}\n")));
        assert!(blobs.contains_key(&bundle.action_digest));
        let input_root: Digest = bundle.action.input_root_digest.clone().unwrap().into();
        assert!(blobs.contains_key(&input_root));
        let command_digest: Digest = bundle.action.command_digest.clone().unwrap().into();
        assert!(blobs.contains_key(&command_digest));
    }

    #[tokio::test]
    async fn action_digest_is_stable_across_runs() {
        let fixture = fixture();
        let argv = &["gcc", "-c", "hello.cpp", "-o", "hello.o"];
        let (first, _) = build(&fixture, argv).await;
        let (second, _) = build(&fixture, argv).await;
        assert_eq!(
            first.unwrap().action_digest,
            second.unwrap().action_digest
        );
    }

    #[tokio::test]
    async fn remote_env_and_platform_are_sorted_into_the_command() {
        let mut fixture = fixture();
        fixture.config.remote_env.insert("ZVAR".into(), "z".into());
        fixture.config.remote_env.insert("AVAR".into(), "a".into());
        fixture
            .config
            .remote_platform
            .insert("OSFamily".into(), "linux".into());

        let (bundle, _) = build(&fixture, &["gcc", "-c", "hello.cpp", "-o", "hello.o"]).await;
        let command = bundle.unwrap().command;
        let names: Vec<_> = command
            .environment_variables
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["AVAR", "ZVAR"]);
        assert_eq!(command.platform.unwrap().properties[0].name, "OSFamily");
    }

    #[tokio::test]
    async fn absolute_products_force_local_execution() {
        let mut fixture = fixture();
        fixture.config.output_files_override =
            ["/somewhere/else/hello.o".to_string()].into_iter().collect();
        let (bundle, _) = build(&fixture, &["gcc", "-c", "hello.cpp", "-o", "hello.o"]).await;
        assert!(bundle.is_none());
    }

    #[tokio::test]
    async fn uncacheable_flag_reaches_the_action() {
        let mut fixture = fixture();
        fixture.config.action_uncacheable = true;
        let (bundle, _) = build(&fixture, &["gcc", "-c", "hello.cpp", "-o", "hello.o"]).await;
        assert!(bundle.unwrap().action.do_not_cache);
    }
}
