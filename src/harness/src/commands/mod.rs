use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};

pub mod distro_info;

/// Captured output of one external command. Output bytes are kept raw since
/// build logs are not guaranteed to be UTF-8.
pub struct CommandResult {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandResult {
    pub fn from_output(output: Output) -> Self {
        CommandResult {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Shell-style exit code: signal deaths map to 128 + signal number, so a
    /// build killed with SIGKILL reports 137 and no real process can ever
    /// produce the harness's -1 sentinel.
    pub fn exit_code(&self) -> i32 {
        match self.status.code() {
            Some(code) => code,
            None => 128 + self.status.signal().unwrap_or(0),
        }
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}
