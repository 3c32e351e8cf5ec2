//! The `recc` binary: runs a compiler command on a Remote Execution
//! cluster, or locally when the command can't go remote.

use std::io::Write;

use clap::Parser;
use tracing::{debug, error};

use recc::actionbuilder;
use recc::actioncache::ActionCacheClient;
use recc::auth::AuthSession;
use recc::cas::CasClient;
use recc::channel::channel_for;
use recc::execution::{self, ExecutionClient};
use recc::merkle::BlobMap;
use recc::parser::ParsedCommand;
use recc::retry::Retrier;
use recc::{pathutil, Config, Error, Result};

/// If the given command is a compile command, runs it on a remote build
/// server; otherwise runs it locally. Configured entirely through RECC_*
/// environment variables and recc.conf files (see the project README).
#[derive(Parser)]
#[command(name = "recc", version, about, long_about = None)]
struct Cli {
    /// The build command, e.g. `gcc -c hello.cpp -o hello.o`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let verbose = std::env::var("RECC_VERBOSE").is_ok_and(|v| !v.is_empty());
    recc::init_logging(verbose);
    let config = Config::load();

    match run(cli.command, &config).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: Vec<String>, config: &Config) -> Result<i32> {
    let cwd = std::env::current_dir()?.to_string_lossy().into_owned();
    let parsed = ParsedCommand::parse(&command, &cwd, config)?;

    let mut blobs = BlobMap::new();
    let Some(bundle) = actionbuilder::build_action(&parsed, &cwd, config, &mut blobs).await?
    else {
        return run_locally(&command);
    };

    let auth = if config.server_jwt {
        Some(AuthSession::from_file(pathutil::expand_path(
            &config.jwt_json_file_path,
        )?)?)
    } else {
        None
    };
    let retrier = Retrier::from_config(config, auth.clone());

    let cas = CasClient::new(
        channel_for(&config.cas_server, config)?,
        config.instance.clone(),
        auth.clone(),
        retrier.clone(),
        config.max_concurrent_jobs,
    );
    let action_cache = ActionCacheClient::new(
        channel_for(&config.action_cache_server, config)?,
        config.instance.clone(),
        auth.clone(),
        retrier.clone(),
    );
    let execution_client = ExecutionClient::new(
        channel_for(&config.server, config)?,
        config.instance.clone(),
        auth,
        retrier,
    );

    execution::install_sigint_handler();

    debug!(blobs = blobs.len(), "uploading resources");
    cas.upload_resources(&blobs).await?;

    // Inputs are uploaded, so the server can validate the Action if it
    // wants to; now probe the cache.
    let mut result_proto = None;
    if !config.skip_cache {
        result_proto = match action_cache.get_action_result(&bundle.action_digest).await {
            Ok(cached) => cached,
            Err(e) => {
                debug!("action cache lookup failed: {}", e);
                None
            }
        };
    }

    let result_proto = match result_proto {
        Some(cached) => cached,
        None => {
            debug!("executing action remotely");
            execution_client
                .execute_action(
                    &bundle.action_digest,
                    config.skip_cache || config.action_uncacheable,
                )
                .await?
        }
    };

    let result = execution::resolve_action_result(result_proto, &cas).await?;

    // Compiler output goes to the real stdout/stderr, never the logger.
    let stdout = result.stdout.bytes(&cas).await?;
    std::io::stdout().write_all(&stdout)?;
    std::io::stdout().flush()?;
    let stderr = result.stderr.bytes(&cas).await?;
    std::io::stderr().write_all(&stderr)?;

    if !config.dont_save_output {
        execution::write_files_to_disk(&result, &cas, ".").await?;
    }

    Ok(result.exit_code)
}

/// Replaces this process with the original command. Only returns (with an
/// error) if the exec itself fails.
fn run_locally(command: &[String]) -> Result<i32> {
    use std::os::unix::process::CommandExt;

    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Usage("no command given".into()))?;
    debug!(program = %program, "running locally");
    let error = std::process::Command::new(program).args(args).exec();
    Err(Error::Io(error))
}
