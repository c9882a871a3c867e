use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tokio::process::Command;

use super::{EngineError, Extractor};
use crate::models::ExtractionOptions;

pub const DEFAULT_PROGRAM: &str = "yt-dlp";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

static ERROR_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ERROR:\s*(.+?)\s*$").unwrap());

/// Runs `yt-dlp --dump-single-json` once per request and hands back its JSON
/// untouched.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    timeout: Duration,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

impl YtDlp {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn args(url: &str, options: &ExtractionOptions) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
        ];
        if let Some(format) = &options.format {
            args.push("-f".to_string());
            args.push(format.clone());
        }
        if let Some(quality) = &options.quality {
            args.push("-S".to_string());
            args.push(quality.clone());
        }
        // keep a URL starting with '-' from being read as a flag
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl Extractor for YtDlp {
    type Output = Value;

    async fn extract(&self, url: &str, options: &ExtractionOptions) -> Result<Value, EngineError> {
        let child = Command::new(&self.program)
            .args(Self::args(url, options))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    EngineError::NotInstalled(self.program.clone())
                } else {
                    EngineError::Spawn {
                        tool: self.program.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        // dropping the child on timeout (or when the request is abandoned)
        // kills the process
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| EngineError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| EngineError::Spawn {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Failed(failure_message(&stderr, output.status.code())));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| EngineError::Output(e.to_string()))
    }
}

/// Picks the most useful line out of yt-dlp's stderr.
fn failure_message(stderr: &str, code: Option<i32>) -> String {
    if let Some(caps) = ERROR_LINE_RE.captures_iter(stderr).last() {
        return caps[1].to_string();
    }
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .map(str::to_string)
        .unwrap_or_else(|| match code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_without_hints() {
        let args = YtDlp::args("https://example.com/v", &ExtractionOptions::default());
        assert_eq!(
            args,
            ["--dump-single-json", "--no-warnings", "--no-playlist", "--", "https://example.com/v"]
        );
    }

    #[test]
    fn args_with_hints() {
        let options = ExtractionOptions {
            format: Some("bestaudio".into()),
            quality: Some("res:720".into()),
        };
        let args = YtDlp::args("https://example.com/v", &options);
        assert_eq!(
            &args[3..],
            ["-f", "bestaudio", "-S", "res:720", "--", "https://example.com/v"]
        );
    }

    #[test]
    fn failure_message_prefers_last_error_line() {
        let stderr = "WARNING: something\nERROR: first\n[debug] x\nERROR: [generic] Unsupported URL: https://x\n";
        assert_eq!(
            failure_message(stderr, Some(1)),
            "[generic] Unsupported URL: https://x"
        );
    }

    #[test]
    fn failure_message_falls_back_to_last_line() {
        assert_eq!(failure_message("Traceback\n  boom  \n\n", Some(1)), "boom");
        assert_eq!(failure_message("", Some(2)), "exited with status 2");
        assert_eq!(failure_message("  \n", None), "terminated by signal");
    }

    #[tokio::test]
    async fn missing_program_is_not_installed() {
        let engine = YtDlp::new("yt-dlp-missing-binary-xyz", Duration::from_secs(5));
        let err = engine
            .extract("https://example.com/v", &ExtractionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotInstalled(_)));
        assert_eq!(err.to_string(), "yt-dlp-missing-binary-xyz is not installed");
    }
}
