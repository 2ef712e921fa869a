//! Process runner backed by `tokio::process`.

use std::io;
use std::process::Stdio;

use futures::future::{BoxFuture, FutureExt};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::context::{Invocation, ProcessOutcome, ProcessRunner};

/// Runs programs on the local machine.
///
/// stdout and stderr stay attached to the terminal so interactive prompts
/// (such as license review) reach the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    async fn run_invocation(invocation: &Invocation) -> io::Result<ProcessOutcome> {
        debug!("Running {:?} {:?}", invocation.program, invocation.args);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).envs(&invocation.env);

        let status = match &invocation.stdin {
            None => cmd.status().await?,
            Some(input) => {
                let mut child = cmd.stdin(Stdio::piped()).spawn()?;

                if let Some(mut stdin) = child.stdin.take() {
                    // the program may exit before consuming all of the input
                    match stdin.write_all(input).await {
                        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                        _ => {}
                    }
                }

                child.wait().await?
            }
        };

        Ok(ProcessOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}

impl ProcessRunner for SystemRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<ProcessOutcome>> {
        Self::run_invocation(invocation).boxed()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exit_code_is_reported() {
        let invocation = Invocation::new("/bin/sh").arg("-c").arg("exit 3");
        let outcome = SystemRunner.run(&invocation).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.code, Some(3));
    }

    #[tokio::test]
    async fn test_stdin_and_env_are_passed() {
        let mut invocation = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("read answer && [ \"$answer\" = y ] && [ \"$ANDROID_HOME\" = /sdk ]")
            .stdin(b"y\n".repeat(20));
        invocation
            .env
            .insert("ANDROID_HOME".to_string(), "/sdk".to_string());

        let outcome = SystemRunner.run(&invocation).await.unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let invocation = Invocation::new("/definitely/not/a/program");
        assert!(SystemRunner.run(&invocation).await.is_err());
    }
}
