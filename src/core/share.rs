//! Sharing a conversion: text formatting and the share capabilities.

use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::core::converter::{ConversionInput, ConversionResult};
use crate::core::format::{format_amount, format_rate};

pub const SHARE_TITLE: &str = "Conversión de Divisas";
/// Environment variable carrying the share title to a [`CommandShare`] program.
pub const SHARE_TITLE_ENV: &str = "DIVISA_SHARE_TITLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

/// Builds the shareable summary of a conversion.
pub fn build_share_payload(
    amount: f64,
    input: &ConversionInput,
    result: &ConversionResult,
    page_url: &str,
) -> SharePayload {
    let from = &input.from_currency;
    let to = &input.to_currency;
    let text = format!(
        "💰 {SHARE_TITLE}\n\n{} {from} = {} {to}\nTasa de cambio: 1 {from} = {} {to}\n\n📱 Calculado con Calculadora Financiera | {page_url}",
        format_amount(amount),
        format_amount(result.converted_amount),
        format_rate(result.effective_rate),
    );

    SharePayload {
        title: SHARE_TITLE.to_string(),
        text,
    }
}

/// A platform facility able to hand content to other applications.
pub trait NativeShare: Send + Sync {
    fn share(&self, payload: &SharePayload) -> Result<()>;
}

pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Pipes the share text into an external program's stdin, e.g.
/// `termux-share` or `wl-copy`. The title goes in `DIVISA_SHARE_TITLE`.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    /// Builds a share command from `program arg...`; `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl NativeShare for CommandShare {
    fn share(&self, payload: &SharePayload) -> Result<()> {
        debug!(program = %self.program, "Sharing through external command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(SHARE_TITLE_ENV, &payload.title)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start share command: {}", self.program))?;

        // stdin is dropped at the end of this block so the child sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin
                .write_all(payload.text.as_bytes())
                .with_context(|| format!("Failed to write to share command: {}", self.program)),
            None => Err(anyhow!("Share command has no stdin: {}", self.program)),
        };

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for share command: {}", self.program))?;
        written?;
        if !status.success() {
            bail!("Share command {} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// The desktop clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| anyhow!("Failed to access clipboard: {e}"))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow!("Failed to copy to clipboard: {e}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    CopiedToClipboard,
}

/// Where shared content goes, picked once by capability detection.
pub enum Sharer {
    NativeShare(Box<dyn NativeShare>),
    ClipboardFallback(Box<dyn ClipboardWriter>),
}

impl Sharer {
    /// Prefers the native capability when the platform offers one.
    pub fn detect(
        native: Option<Box<dyn NativeShare>>,
        clipboard: Box<dyn ClipboardWriter>,
    ) -> Self {
        match native {
            Some(native) => Sharer::NativeShare(native),
            None => Sharer::ClipboardFallback(clipboard),
        }
    }

    pub fn share(&self, payload: &SharePayload) -> Result<ShareOutcome> {
        match self {
            Sharer::NativeShare(native) => {
                native.share(payload)?;
                Ok(ShareOutcome::Shared)
            }
            Sharer::ClipboardFallback(clipboard) => {
                clipboard.write_text(&payload.text)?;
                Ok(ShareOutcome::CopiedToClipboard)
            }
        }
    }
}
