//! Uploads the given files to CAS inside a directory matching their paths,
//! then prints the root Directory digest (hash, then size). `casupload
//! file1.txt subdir/file2.txt` creates a CAS directory holding `file1.txt`
//! and a subdirectory `subdir` holding `file2.txt`.

use std::path::Path;

use clap::Parser;
use tracing::error;

use recc::cas::CasClient;
use recc::channel::channel_for;
use recc::merkle::{BlobMap, InputFile, NestedDirectory};
use recc::retry::Retrier;
use recc::{pathutil, Config, Error, Result};

/// Uploads the given files to CAS and prints the digest of the resulting
/// directory. The server and instance are taken from RECC_CAS_SERVER /
/// RECC_INSTANCE.
#[derive(Parser)]
#[command(name = "casupload", version, about, long_about = None)]
struct Cli {
    /// Files to place into the uploaded directory.
    #[arg(required = true)]
    paths: Vec<String>,
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

    if let Err(e) = run(cli.paths, &config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(paths: Vec<String>, config: &Config) -> Result<()> {
    let mut nested = NestedDirectory::default();
    let mut blobs = BlobMap::new();

    for path in &paths {
        let file = InputFile::from_path(Path::new(path))?.ok_or_else(|| {
            Error::Usage(format!("{} is not a regular file or symlink", path))
        })?;
        if !file.is_symlink() {
            blobs.insert(file.digest().clone(), file.contents().clone());
        }
        nested.add(file, &pathutil::normalize(path));
    }

    let root_digest = nested.to_digest(&mut blobs);

    let retrier = Retrier::from_config(config, None);
    let cas = CasClient::new(
        channel_for(&config.cas_server, config)?,
        config.instance.clone(),
        None,
        retrier,
        config.max_concurrent_jobs,
    );
    cas.upload_resources(&blobs).await?;

    println!("{}", root_digest.hash());
    println!("{}", root_digest.size_bytes());
    Ok(())
}
