//! Argument lists for the ffmpeg / ffprobe invocations

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;

use crate::domain::model::TrimRequest;
use crate::engine::EngineConfig;

/// Number of stderr lines kept when an invocation fails
const STDERR_TAIL_LINES: usize = 20;

/// Arguments for trimming one segment.
///
/// `-ss` comes before `-i` so the engine seeks the input rather than decoding
/// and discarding everything up to the start offset.
pub fn trim_args(request: &TrimRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-nostdin".into(),
        "-y".into(),
    ];
    args.push("-ss".into());
    args.push(format_seconds(request.start).into());
    args.push("-i".into());
    args.push(request.source.as_os_str().to_owned());
    args.push("-t".into());
    args.push(format_seconds(request.duration).into());
    args.push(request.destination.as_os_str().to_owned());
    args
}

/// Arguments for probing a file into JSON on stdout
pub fn probe_args(file_path: &Path) -> Vec<OsString> {
    vec![
        "-v".into(),
        "error".into(),
        "-print_format".into(),
        "json".into(),
        "-show_format".into(),
        "-show_streams".into(),
        file_path.as_os_str().to_owned(),
    ]
}

/// Build the ffmpeg command for a trim request
pub fn ffmpeg_command(config: &EngineConfig, request: &TrimRequest) -> Command {
    let mut cmd = Command::new(&config.ffmpeg_path);
    cmd.args(trim_args(request));
    cmd.stdin(std::process::Stdio::null());
    cmd.stdout(std::process::Stdio::null());
    cmd.stderr(std::process::Stdio::piped());
    cmd.kill_on_drop(true);
    cmd
}

/// Build the ffprobe command for a file
pub fn ffprobe_command(config: &EngineConfig, file_path: &Path) -> Command {
    let mut cmd = Command::new(&config.ffprobe_path);
    cmd.args(probe_args(file_path));
    cmd.stdin(std::process::Stdio::null());
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());
    cmd.kill_on_drop(true);
    cmd
}

/// Seconds with millisecond precision, the way ffmpeg accepts them
pub fn format_seconds(seconds: f64) -> String {
    let formatted = format!("{:.3}", seconds);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Last lines of an engine's stderr, trimmed
pub fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
