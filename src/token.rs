//! Session token lookup. The token only ever lives in memory for one upload.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

pub const TOKEN_ENV_VAR: &str = "APPLE_HEALTH_SESSION_TOKEN";

/// Token from `APPLE_HEALTH_SESSION_TOKEN`, otherwise prompted on stdin.
pub fn resolve_token() -> Result<String> {
    let from_env = std::env::var(TOKEN_ENV_VAR).unwrap_or_default();
    if let Some(token) = non_blank(&from_env) {
        return Ok(token);
    }

    let stdin = io::stdin();
    prompt_for_token(&mut stdin.lock(), &mut io::stderr())
}

pub fn prompt_for_token(input: &mut impl BufRead, prompt: &mut impl Write) -> Result<String> {
    write!(
        prompt,
        "Enter a short-lived session token (will not be stored on disk): "
    )?;
    prompt.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read session token")?;

    match non_blank(&line) {
        Some(token) => Ok(token),
        None => bail!("A session token is required to continue."),
    }
}

/// Printable form of a token: first four characters, the rest masked.
pub fn redact(token: &str) -> String {
    if token.chars().count() >= 4 {
        let prefix: String = token.chars().take(4).collect();
        format!("{prefix}***")
    } else {
        "***".to_string()
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
