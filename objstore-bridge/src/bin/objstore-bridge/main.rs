/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::process::ExitCode;

use aws_smithy_types::error::display::DisplayErrorContext;
use clap::Parser;
use objstore_bridge::config::loader::ConfigLoader;
use objstore_bridge::error::{Error, ErrorKind};
use objstore_bridge::operation::list_directory::render_listing;
use objstore_bridge::types::ConcurrencySetting;
use objstore_bridge::Client;

mod cli;
mod logging;

use cli::{Args, Command};

async fn load_client(args: &Args) -> Result<Client, Error> {
    let target = args.command.target();
    let mut loader = ConfigLoader::default()
        .bucket(&target.host)
        .access_key(&target.user);
    if let Some(endpoint) = &args.endpoint {
        loader = loader.endpoint(endpoint);
    }
    if let Some(region) = &args.region {
        loader = loader.region(region);
    }
    if let Some(concurrency) = args.concurrency {
        loader = loader.concurrency(ConcurrencySetting::Explicit(concurrency.into()));
    }
    Ok(Client::new(loader.load().await?))
}

async fn run(args: Args) -> Result<(), Error> {
    match &args.command {
        Command::Mkdir { path, .. } => {
            tracing::info!("mkdir {path}: directories exist implicitly, nothing to do");
            return Ok(());
        }
        Command::Chdir { path, .. } => {
            println!("{path}");
            return Ok(());
        }
        _ => {}
    }

    let client = load_client(&args).await?;
    match args.command {
        Command::Get { remote, local, .. } => {
            client.download().key(remote).destination(local).send().await?;
        }
        Command::Put { local, remote, .. } => {
            let output = client.upload().path(local).key(remote).send().await?;
            tracing::info!(
                "stored {} ({} bytes, {:?})",
                output.key(),
                output.content_length(),
                output.strategy()
            );
        }
        Command::Ls { path, .. } => {
            let output = client.list_directory().path(path).send().await?;
            print!("{}", render_listing(&output.rows(&chrono::Local)));
        }
        Command::Rmdir { path, .. } => {
            client.remove_directory().path(path).send().await?;
        }
        Command::Delete { path, .. } => {
            client.delete().key(path).send().await?;
        }
        Command::Mkdir { .. } | Command::Chdir { .. } => {}
    }
    Ok(())
}

fn log_failure(err: &Error) {
    match err.kind() {
        ErrorKind::RemoteStore(failure) => tracing::error!(
            operation = %failure.operation(),
            part_number = failure.part_number(),
            "{}",
            DisplayErrorContext(err)
        ),
        ErrorKind::PartialMultipartFailure(partial) => tracing::error!(
            upload_id = partial.upload_id(),
            failed_parts = ?partial.failed_parts(),
            "{}",
            DisplayErrorContext(err)
        ),
        kind => tracing::error!(kind = ?kind, "{}", DisplayErrorContext(err)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = logging::init(args.log_dir.as_deref()) {
        eprintln!("failed to set up logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_failure(&err);
            ExitCode::FAILURE
        }
    }
}
