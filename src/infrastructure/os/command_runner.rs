use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::ports::command::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use crate::domain::value_objects::OutputEncoding;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs commands with `std::process`, enforcing the per-command timeout
/// and decoding output with the declared encoding.
///
/// stdout and stderr are drained by one reader thread each so that a child
/// filling its pipe cannot block while we poll for its exit.
pub struct SystemCommandRunner {
    encoding: OutputEncoding,
}

impl SystemCommandRunner {
    #[must_use]
    pub const fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    fn decode(&self, spec: &CommandSpec, bytes: &[u8]) -> Result<String, CommandError> {
        self.encoding
            .decode(bytes)
            .ok_or_else(|| CommandError::Decode {
                program: spec.program.clone(),
                encoding: self.encoding,
            })
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new(OutputEncoding::default())
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        tracing::debug!(command = %spec, timeout_secs = spec.timeout.as_secs(), "executando comando");

        let stdin = if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CommandError::NotFound(spec.program.clone()),
                _ => CommandError::SpawnFailed {
                    program: spec.program.clone(),
                    reason: e.to_string(),
                },
            })?;

        if let (Some(input), Some(mut pipe)) = (spec.stdin.as_deref(), child.stdin.take()) {
            // The child may exit before reading everything.
            if let Err(e) = pipe.write_all(input.as_bytes()) {
                tracing::debug!(command = %spec, "stdin fechado antes do fim: {e}");
            }
        }

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = wait_with_deadline(&mut child, spec.timeout).map_err(|e| {
            CommandError::SpawnFailed {
                program: spec.program.clone(),
                reason: e.to_string(),
            }
        })?;

        let Some(status) = status else {
            tracing::warn!(command = %spec, "tempo limite excedido, processo encerrado");
            return Err(CommandError::Timeout {
                program: spec.program.clone(),
                secs: spec.timeout.as_secs(),
            });
        };

        let stdout = self.decode(spec, &join_reader(stdout_reader))?;
        let stderr = self.decode(spec, &join_reader(stderr_reader))?;

        tracing::debug!(command = %spec, code = ?status.code(), "comando concluído");

        Ok(CommandOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                tracing::debug!("leitura de saída interrompida: {e}");
            }
            buf
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

/// Waits for `child` until `timeout`; kills and reaps it on expiry.
///
/// Returns `Ok(None)` when the deadline was hit.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                tracing::debug!("falha ao encerrar processo: {e}");
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
