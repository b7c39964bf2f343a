/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;

/// Command line arguments.
///
/// Every command follows the backup pipeline's calling convention:
/// `<command> <password-placeholder> [params...] <host> <accessKeyUserName>`, where the
/// host is the bucket name and the secret key is read from the `PASSWORD` environment
/// variable.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "objstore-bridge")]
#[command(about = "Treats an S3-compatible object storage bucket as a backup destination.")]
pub(crate) struct Args {
    /// Object store endpoint URL
    #[arg(long, global = true)]
    pub(crate) endpoint: Option<String>,

    /// Region used to sign requests
    #[arg(long, global = true)]
    pub(crate) region: Option<String>,

    /// Number of parts uploaded concurrently for a multipart upload
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub(crate) concurrency: Option<u16>,

    /// Directory to write dated log files to; logs go to stderr when unset
    #[arg(long, global = true)]
    pub(crate) log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Bucket and credentials trailing every command
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct Target {
    /// Bucket name
    pub(crate) host: String,

    /// Access key ID
    #[arg(value_name = "ACCESS_KEY_USER_NAME")]
    pub(crate) user: String,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub(crate) enum Command {
    /// Download an object to a local file
    Get {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        remote: String,
        local: PathBuf,
        #[command(flatten)]
        target: Target,
    },
    /// Upload a local file, in parts when it is large
    Put {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        local: PathBuf,
        remote: String,
        #[command(flatten)]
        target: Target,
    },
    /// List the immediate children of a directory
    Ls {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        path: String,
        #[command(flatten)]
        target: Target,
    },
    /// Create a directory (directories exist implicitly, nothing is sent)
    Mkdir {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        path: String,
        #[command(flatten)]
        target: Target,
    },
    /// Change directory; echoes the path back
    Chdir {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        path: String,
        #[command(flatten)]
        target: Target,
    },
    /// Delete every object under a directory
    Rmdir {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        path: String,
        #[command(flatten)]
        target: Target,
    },
    /// Delete a single object
    Delete {
        #[arg(value_name = "PASSWORD_PLACEHOLDER")]
        _password: String,
        path: String,
        #[command(flatten)]
        target: Target,
    },
}

impl Command {
    /// Bucket and access key the command runs against
    pub(crate) fn target(&self) -> &Target {
        match self {
            Command::Get { target, .. }
            | Command::Put { target, .. }
            | Command::Ls { target, .. }
            | Command::Mkdir { target, .. }
            | Command::Chdir { target, .. }
            | Command::Rmdir { target, .. }
            | Command::Delete { target, .. } => target,
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("objstore-bridge").chain(args.iter().copied()))
    }

    #[test]
    fn test_put_positionals() {
        let args = parse(&["put", "x", "/backup/home.tar", "weekly/home.tar", "bucket", "alice"]).unwrap();
        match args.command {
            Command::Put {
                local,
                remote,
                target,
                ..
            } => {
                assert_eq!(PathBuf::from("/backup/home.tar"), local);
                assert_eq!("weekly/home.tar", remote);
                assert_eq!("bucket", target.host);
                assert_eq!("alice", target.user);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_get_positionals() {
        let args = parse(&["get", "x", "weekly/home.tar", "/restore/home.tar", "bucket", "alice"]).unwrap();
        match args.command {
            Command::Get { remote, local, .. } => {
                assert_eq!("weekly/home.tar", remote);
                assert_eq!(PathBuf::from("/restore/home.tar"), local);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_single_path_commands() {
        for command in ["ls", "mkdir", "chdir", "rmdir", "delete"] {
            let args = parse(&[command, "x", "/weekly", "bucket", "alice"]).unwrap();
            assert_eq!("bucket", args.command.target().host, "{command}");
            assert_eq!("alice", args.command.target().user, "{command}");
        }
    }

    #[test]
    fn test_wrong_arity_rejected() {
        assert!(parse(&["put", "x", "/backup/home.tar", "bucket", "alice"]).is_err());
        assert!(parse(&["ls", "x", "/weekly", "bucket", "alice", "extra"]).is_err());
        assert!(parse(&["delete", "x", "bucket"]).is_err());
        assert!(parse(&["cp", "x", "a", "b", "bucket", "alice"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = parse(&[
            "--endpoint",
            "http://localhost:9000",
            "--concurrency",
            "8",
            "--log-dir",
            "/var/log/bridge",
            "mkdir",
            "x",
            "/weekly",
            "bucket",
            "alice",
        ])
        .unwrap();
        assert_eq!(Some("http://localhost:9000"), args.endpoint.as_deref());
        assert_eq!(Some(8), args.concurrency);
        assert_eq!(Some(PathBuf::from("/var/log/bridge")), args.log_dir);
        assert!(matches!(args.command, Command::Mkdir { .. }));

        assert!(parse(&["--concurrency", "0", "mkdir", "x", "/w", "b", "u"]).is_err());
    }
}
