//! Delivery of the result text to the system clipboard or stdout.

use crate::error::ClipError;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Destination for the text produced by a run.
pub trait ClipboardWriter {
    fn deliver(&mut self, text: &str) -> Result<()>;
}

/// Prints to stdout instead of touching the clipboard.
pub struct StdoutWriter;

impl ClipboardWriter for StdoutWriter {
    fn deliver(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Pipes text into a platform clipboard utility.
///
/// - macOS: `pbcopy`
/// - Linux: `wl-copy` (Wayland), `xclip`, or `xsel`
/// - Windows: `clip`
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: PathBuf,
    args: Vec<&'static str>,
    envs: Vec<(&'static str, &'static str)>,
}

impl CommandClipboard {
    /// Finds the clipboard utility for this platform.
    #[cfg(target_os = "macos")]
    pub fn detect() -> Result<Self> {
        Ok(Self {
            program: PathBuf::from("pbcopy"),
            args: Vec::new(),
            envs: vec![("LANG", "en_US.UTF-8")],
        })
    }

    #[cfg(target_os = "linux")]
    pub fn detect() -> Result<Self> {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        let candidates: Vec<(&str, Vec<&'static str>, bool)> = vec![
            ("wl-copy", Vec::new(), wayland),
            ("xclip", vec!["-selection", "clipboard"], true),
            ("xsel", vec!["--clipboard", "--input"], true),
        ];

        candidates
            .into_iter()
            .filter(|(_, _, usable)| *usable)
            .find_map(|(name, args, _)| {
                which::which(name).ok().map(|program| Self {
                    program,
                    args,
                    envs: Vec::new(),
                })
            })
            .ok_or_else(|| {
                ClipError::Clipboard(
                    "no clipboard tool available, install wl-copy, xclip or xsel (or use -p)"
                        .to_string(),
                )
                .into()
            })
    }

    #[cfg(target_os = "windows")]
    pub fn detect() -> Result<Self> {
        Ok(Self {
            program: PathBuf::from("cmd"),
            args: vec!["/C", "clip"],
            envs: Vec::new(),
        })
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    pub fn detect() -> Result<Self> {
        Err(ClipError::Clipboard("clipboard not supported on this platform".to_string()).into())
    }
}

impl ClipboardWriter for CommandClipboard {
    fn deliver(&mut self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.envs.iter().copied())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        // stdin is dropped at the end of this block so the utility sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        // Reap the child even when the write failed
        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", self.program.display()))?;
        written.with_context(|| format!("Failed to write to {}", self.program.display()))?;
        if !status.success() {
            return Err(ClipError::Clipboard(format!(
                "{} exited with {}",
                self.program.display(),
                status
            ))
            .into());
        }
        Ok(())
    }
}

/// Picks stdout or the system clipboard.
pub fn writer_for(to_stdout: bool) -> Result<Box<dyn ClipboardWriter>> {
    if to_stdout {
        Ok(Box::new(StdoutWriter))
    } else {
        Ok(Box::new(CommandClipboard::detect()?))
    }
}

#[cfg(test)]
#[path = "tests/clipboard_tests.rs"]
mod tests;
