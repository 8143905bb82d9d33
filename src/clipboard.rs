/*!
 * Clipboard delivery for quick exports
 *
 * Copies text by piping it into whichever clipboard command the platform
 * provides.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Destination for quick export text
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`
    fn copy(&self, text: &str) -> Result<()>;
}

/// Clipboard commands, in order of preference per platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Tmux,
    Wayland,
    Xsel,
    Xclip,
    MacOS,
    Windows,
    Termux,
}

impl Provider {
    fn program(self) -> &'static str {
        match self {
            Self::Tmux => "tmux",
            Self::Wayland => "wl-copy",
            Self::Xsel => "xsel",
            Self::Xclip => "xclip",
            Self::MacOS => "pbcopy",
            Self::Windows => "clip.exe",
            Self::Termux => "termux-clipboard-set",
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Tmux => &["load-buffer", "-w", "-"],
            Self::Xsel => &["-b", "-i"],
            Self::Xclip => &["-selection", "clipboard", "-in"],
            Self::Wayland | Self::MacOS | Self::Windows | Self::Termux => &[],
        }
    }

    fn candidates() -> Vec<Self> {
        let mut providers = Vec::new();
        if env::var_os("TMUX").is_some() {
            providers.push(Self::Tmux);
        }
        if cfg!(target_os = "macos") {
            providers.push(Self::MacOS);
        } else if cfg!(target_os = "windows") || env::var_os("WSL_DISTRO_NAME").is_some() {
            providers.push(Self::Windows);
        } else if cfg!(target_os = "android") {
            providers.push(Self::Termux);
        } else {
            providers.extend([Self::Wayland, Self::Xsel, Self::Xclip]);
        }
        providers
    }
}

/// The desktop clipboard, reached through an external command
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    provider: Provider,
}

impl SystemClipboard {
    /// Pick the first clipboard command available on this system
    pub fn detect() -> Result<Self> {
        Provider::candidates()
            .into_iter()
            .find(|p| command_exists(p.program()))
            .map(|provider| {
                debug!(?provider, "using clipboard provider");
                Self { provider }
            })
            .ok_or(ClipboardError::NoClipboardFound)
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let cmd = self.provider.program();
        let mut child = Command::new(cmd)
            .args(self.provider.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CommandFailed(format!("failed to spawn {}: {}", cmd, e)))?;

        child
            .stdin
            .take()
            .ok_or_else(|| ClipboardError::CommandFailed(format!("no stdin for {}", cmd)))?
            .write_all(text.as_bytes())?;

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed(format!(
                "{} exited with status: {}",
                cmd, status
            )))
        }
    }
}

/// Check if a command is on the PATH
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}
