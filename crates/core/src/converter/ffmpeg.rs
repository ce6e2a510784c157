//! FFmpeg-backed tool implementations.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::ToolError;
use super::traits::{Prober, StreamQuery, Transcoder};

/// Renders a command line for logs, quoting arguments that need it.
pub fn render_command(program: &Path, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(quote(&program.to_string_lossy()));
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\\\""))
}

/// `ffprobe` wrapper.
pub struct FfprobeTool {
    path: PathBuf,
}

impl FfprobeTool {
    /// Creates a prober that runs the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn build_args(path: &Path, query: &StreamQuery) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            query.selector.to_string(),
            "-show_entries".to_string(),
            query.show_entries(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    /// Splits stdout into trimmed, non-empty lines.
    fn parse_lines(stdout: &str) -> Vec<String> {
        stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl Prober for FfprobeTool {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path, query: &StreamQuery) -> Result<Vec<String>, ToolError> {
        let args = Self::build_args(path, query);
        debug!("Probing: {}", render_command(&self.path, &args));

        let output = Command::new(&self.path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ToolError::from_spawn("ffprobe", &self.path, e))?;

        if !output.status.success() {
            return Err(ToolError::failed(
                render_command(&self.path, &args),
                output.status.code(),
                &output.stderr,
            ));
        }

        Ok(Self::parse_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// `ffmpeg` wrapper.
pub struct FfmpegTool {
    path: PathBuf,
}

impl FfmpegTool {
    /// Creates a transcoder that runs the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Transcoder for FfmpegTool {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn program(&self) -> &Path {
        &self.path
    }

    async fn run(&self, args: &[String]) -> Result<(), ToolError> {
        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ToolError::from_spawn("ffmpeg", &self.path, e))?;

        if !output.status.success() {
            return Err(ToolError::failed(
                render_command(&self.path, args),
                output.status.code(),
                &output.stderr,
            ));
        }

        Ok(())
    }
}
