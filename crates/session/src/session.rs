use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::oracle::BuildOracle;
use crate::scanner::{ResponseScanner, ScanEvent};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, Command};

/// Lifecycle of a [`BuildSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    AwaitingProjectReady,
    Ready,
    AwaitingResult,
    Terminated,
}

type CommandSink = Box<dyn AsyncWrite + Send + Unpin>;
type OutputLines = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

/// A long-lived build console driven one command at a time.
///
/// Strictly half-duplex: a command may only be sent in [`SessionState::Ready`]
/// and the next one only after its response unit has been received.
pub struct BuildSession {
    config: SessionConfig,
    state: SessionState,
    commands: CommandSink,
    output: OutputLines,
    scanner: ResponseScanner,
    child: Option<Child>,
}

impl BuildSession {
    /// Starts the console process and selects the configured project.
    pub async fn spawn(config: SessionConfig) -> Result<Self> {
        config.validate().map_err(SessionError::invalid_config)?;

        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        let spawn_error = |source: std::io::Error| SessionError::Spawn {
            program: config.program.clone(),
            source,
        };
        let mut child = cmd.spawn().map_err(spawn_error)?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error(pipe_missing("stdin")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error(pipe_missing("stdout")))?;

        log::info!(
            "Started `{}` for project {}",
            config.program,
            config.project
        );
        let mut session = Self::with_streams(config, stdin, BufReader::new(stdout));
        session.child = Some(child);
        session.select_project().await?;
        Ok(session)
    }

    /// Runs the session over already-open streams instead of a child process.
    pub async fn connect<W, R>(config: SessionConfig, commands: W, output: R) -> Result<Self>
    where
        W: AsyncWrite + Send + Unpin + 'static,
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        config.validate().map_err(SessionError::invalid_config)?;
        let mut session = Self::with_streams(config, commands, output);
        session.select_project().await?;
        Ok(session)
    }

    fn with_streams<W, R>(config: SessionConfig, commands: W, output: R) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        let scanner = ResponseScanner::new(config.ready_line(), config.complete_marker.clone());
        let output: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(output);
        Self {
            config,
            state: SessionState::Starting,
            commands: Box::new(commands),
            output: output.lines(),
            scanner,
            child: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    async fn select_project(&mut self) -> Result<()> {
        let select = self.config.select_line();
        self.write_line(&select).await?;
        self.state = SessionState::AwaitingProjectReady;

        let limit = self.config.response_timeout();
        tokio::time::timeout(limit, self.scan_until_ready())
            .await
            .map_err(|_| SessionError::Timeout(limit))??;

        self.state = SessionState::Ready;
        log::info!("Build session ready for project {}", self.config.project);
        Ok(())
    }

    async fn scan_until_ready(&mut self) -> Result<()> {
        while let Some(line) = self.output.next_line().await? {
            if self.scanner.feed(&line) == ScanEvent::ProjectReady {
                return Ok(());
            }
        }
        Err(SessionError::ProcessExited("waiting for project selection"))
    }

    /// Writes one command line; the session then awaits its result.
    pub async fn send(&mut self, command: &str) -> Result<()> {
        self.expect_state(SessionState::Ready, "send a command")?;
        self.write_line(command).await?;
        self.state = SessionState::AwaitingResult;
        Ok(())
    }

    /// Blocks until the completion marker and returns the buffered output.
    pub async fn receive(&mut self) -> Result<String> {
        self.expect_state(SessionState::AwaitingResult, "receive a response")?;

        let limit = self.config.response_timeout();
        let response = tokio::time::timeout(limit, self.collect_response())
            .await
            .map_err(|_| SessionError::Timeout(limit))??;

        self.state = SessionState::Ready;
        Ok(response)
    }

    async fn collect_response(&mut self) -> Result<String> {
        while let Some(line) = self.output.next_line().await? {
            if let ScanEvent::Complete(response) = self.scanner.feed(&line) {
                return Ok(response);
            }
        }
        Err(SessionError::ProcessExited("awaiting a command result"))
    }

    /// `send` followed by `receive`
    pub async fn request(&mut self, command: &str) -> Result<String> {
        self.send(command).await?;
        self.receive().await
    }

    /// Sends the exit command and waits for the process to finish.
    ///
    /// A process that outlives the response timeout is killed.
    pub async fn terminate(mut self) -> Result<Option<ExitStatus>> {
        self.expect_state(SessionState::Ready, "terminate")?;

        let exit = self.config.exit_command.clone();
        self.write_line(&exit).await?;
        self.commands.shutdown().await?;
        self.state = SessionState::Terminated;

        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };
        let limit = self.config.response_timeout();
        match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => {
                let status = status?;
                log::info!("Build session for {} exited: {status}", self.config.project);
                Ok(Some(status))
            }
            Err(_) => {
                log::warn!(
                    "Build session for {} ignored `{exit}`; killing it",
                    self.config.project
                );
                child.kill().await?;
                Err(SessionError::Timeout(limit))
            }
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        log::debug!("> {line}");
        self.commands.write_all(line.as_bytes()).await?;
        self.commands.write_all(b"\n").await?;
        self.commands.flush().await?;
        Ok(())
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                state: self.state,
            })
        }
    }
}

#[async_trait]
impl BuildOracle for BuildSession {
    async fn compile(&mut self) -> Result<String> {
        let command = self.config.compile_command.clone();
        self.request(&command).await
    }
}

fn pipe_missing(name: &str) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        format!("{name} was not captured"),
    )
}
