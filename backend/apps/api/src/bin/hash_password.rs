//! Print an Argon2id PHC string for a password read from stdin.
//!
//! The user table is provisioned by operators; this is how they produce
//! `users.password_hash`. Honors `PASSWORD_PEPPER` like the server does.

use std::io::{self, BufRead};

use anyhow::Context;
use platform::password::ClearTextPassword;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let raw = line.trim_end_matches(['\r', '\n']).to_string();

    let password = ClearTextPassword::new(raw).map_err(|e| anyhow::anyhow!("{e}"))?;

    let pepper = std::env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|p| !p.is_empty())
        .map(String::into_bytes);

    let hashed = password
        .hash(pepper.as_deref())
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{}", hashed.as_phc_string());
    Ok(())
}
