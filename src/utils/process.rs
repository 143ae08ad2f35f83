use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Attempt to open a URL in the system default browser.
pub fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

/// Clipboard programs to try, in order, for the current platform.
#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Write `text` to the system clipboard via the platform's clipboard tool.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut last_err = None;

    for (program, args) in CLIPBOARD_COMMANDS {
        match pipe_into(program, args, text) {
            Ok(()) => return Ok(()),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no clipboard tool available")))
}

fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    // Stdin is dropped at the end of this statement so the tool sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed writing to {program}")),
        None => Err(anyhow::anyhow!("clipboard stdin unavailable")),
    };
    if let Err(e) = written {
        let _ = child.kill();
        let _ = child.wait();
        return Err(e);
    }

    let status = child.wait().with_context(|| format!("failed waiting for {program}"))?;
    if !status.success() {
        anyhow::bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn pipe_into_feeds_stdin() {
        pipe_into("sh", &["-c", "cat > /dev/null"], "prompt text").unwrap();
    }

    #[test]
    fn pipe_into_reports_failed_exit() {
        let err = pipe_into("sh", &["-c", "exit 3"], "").unwrap_err();
        assert!(err.to_string().contains("exited with"), "{err}");
    }

    #[test]
    fn pipe_into_reaps_tool_that_stops_reading() {
        // `true` exits without reading, so a large write hits a closed pipe.
        let text = "x".repeat(1 << 20);
        let err = pipe_into("true", &[], &text).unwrap_err();
        assert!(err.to_string().contains("failed writing to true"), "{err}");
    }

    #[test]
    fn missing_tool_is_an_error() {
        let err = pipe_into("mvp-prompt-no-such-clipboard-tool", &[], "x").unwrap_err();
        assert!(err.to_string().contains("failed to start"), "{err}");
    }
}
