#!/usr/bin/env cargo
//! Password hashing utility for searchgate
//!
//! Generates an Argon2id hash and prints a credential record ready to paste
//! into the file named by `CREDENTIALS_FILE`.
//!
//! Usage:
//!   cargo run --bin hash-password
//!   cargo run --bin hash-password "MySecurePassword123!" tim Viewer

use std::env;
use std::io::{self, Write};

use searchgate_api::auth::{hash_password, IdentityRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);

    let password = if let Some(pwd) = args.next() {
        pwd
    } else {
        // Read password from stdin (doesn't show in process list)
        print!("Enter password to hash: ");
        io::stdout().flush()?;

        let mut password = String::new();
        io::stdin().read_line(&mut password)?;
        password.trim().to_string()
    };

    if password.is_empty() {
        eprintln!("Error: Password cannot be empty");
        std::process::exit(1);
    }

    if password.len() < 12 {
        eprintln!("Warning: Password is less than 12 characters. Consider using a longer password.");
    }

    let username = args.next().unwrap_or_else(|| "username".to_string());
    let role = args.next().unwrap_or_else(|| "Viewer".to_string());

    let record = IdentityRecord {
        username,
        email: None,
        full_name: None,
        hashed_secret: hash_password(&password)?,
        role,
        disabled: false,
    };

    println!("\nPassword Hash (Argon2id):");
    println!("{}", record.hashed_secret);
    println!("\nCredential record:");
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
