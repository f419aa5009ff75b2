//! Shared CLI test harness: isolated workspace plus a runner that
//! captures output per invocation.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// Temporary workspace the `ilens` binary runs inside; the session
/// cache lands under it and is dropped with it.
pub struct LensWorkspace {
    dir: TempDir,
}

impl LensWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Drop an export fixture into the workspace, returning its path.
    pub fn write_export(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write export fixture");
        path
    }
}

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `ilens` in the workspace with a scrubbed environment.
pub fn run_ilens<I, S>(workspace: &LensWorkspace, args: I, label: &str) -> CmdResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_ilens_env(workspace, args, &[], label)
}

/// Same as [`run_ilens`], with extra environment variables set.
pub fn run_ilens_env<I, S>(
    workspace: &LensWorkspace,
    args: I,
    envs: &[(&str, &str)],
    label: &str,
) -> CmdResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::cargo_bin("ilens").expect("ilens binary");
    cmd.current_dir(workspace.path())
        .env_remove("ISSUELENS_SESSION")
        .env_remove("ISSUELENS_CACHE_DIR")
        .env_remove("ISSUELENS_SESSION_TTL_MINUTES")
        .env_remove("RUST_LOG")
        .args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run ilens: {e}"));
    CmdResult {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
