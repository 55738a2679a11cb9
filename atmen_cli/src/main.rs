use anyhow::anyhow;
use atmen_cli::commands::{combine, commit, mirror, resolve_secret, reveal_payload, selector};
use atmen_cli::config::{CliCommand, Config, GlobalOptions, SecretCommand};
use atmen_cli::error::CliError;
use atmen_cli::secret_book::{default_secret_book_path, SecretBook};
use clap::Parser;
use libatmen::cryptography::{commitment_id_from_secret, Secret};
use log::*;
use rand_core::OsRng;
use std::path::Path;

fn main() {
    env_logger::init();
    let config: Config = Config::parse();
    let (global_options, command) = config.to_parts();
    let book_path = global_options.secret_book.clone().unwrap_or_else(default_secret_book_path);

    let result = match command {
        CliCommand::Secret(secret_command) => exec_secret_command(secret_command, global_options),
        CliCommand::Commit { secret } => {
            resolve_secret(&secret, &book_path).and_then(|s| commit(&s)).map(|report| println!("{report}"))
        }
        CliCommand::Mirror { qx, qy, shared_secret } => resolve_secret(&shared_secret, &book_path)
            .and_then(|s| mirror(&qx, &qy, &s))
            .map(|report| println!("{report}")),
        CliCommand::Combine { secret, shared_secret } => exec_combine(&secret, &shared_secret, &book_path),
        CliCommand::RevealPayload { id, secret } => {
            resolve_secret(&secret, &book_path).and_then(|s| reveal_payload(&id, &s)).map(|data| println!("{data}"))
        }
        CliCommand::Selector { signature } => {
            println!("{}", selector(&signature));
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("** Error ** \n {err}");
        std::process::exit(1);
    }
}

fn exec_secret_command(cmd: SecretCommand, config: GlobalOptions) -> Result<(), anyhow::Error> {
    let path = config.secret_book.unwrap_or_else(default_secret_book_path);
    match cmd {
        SecretCommand::Create { label } => {
            let mut book = load_or_create_book(&path)?;
            let secret = Secret::random(&mut OsRng);
            let id = commitment_id_from_secret(&secret)?;
            let label = label.unwrap_or_else(|| id.to_string());
            if book.contains(&label) {
                return Err(anyhow!("A secret labelled {label} already exists."));
            }
            book.insert(label.clone(), &secret);
            println!("Secret created: {label} (commitment id {id})");
            println!("Saving secrets to {}", path.display());
            book.save(&path)?;
        }
        SecretCommand::List => {
            let book = load_or_create_book(&path)?;
            println!("{} secrets found.", book.len());
            for label in book.labels() {
                let id = book.get(label).map(|secret| commitment_id_from_secret(&secret?));
                match id {
                    Some(Ok(id)) => println!("{label}: {id}"),
                    Some(Err(err)) => println!("{label}: ** invalid secret: {err} **"),
                    None => {}
                }
            }
        }
        SecretCommand::Delete { label } => {
            let mut book = load_or_create_book(&path)?;
            match book.remove(&label) {
                Some(_) => {
                    println!("Secret deleted: {label}");
                    book.save(&path)?;
                }
                None => return Err(anyhow!("No secret labelled {label}.")),
            }
        }
    }
    Ok(())
}

fn exec_combine(secret: &str, shared_secret: &str, book_path: &Path) -> Result<(), anyhow::Error> {
    let secret = resolve_secret(secret, book_path)?;
    let shared_secret = resolve_secret(shared_secret, book_path)?;
    let (combined, id) = combine(&secret, &shared_secret)?;
    println!("Secret: 0x{}", combined.as_hex());
    println!("Id: {id}");
    Ok(())
}

fn load_or_create_book(path: &Path) -> Result<SecretBook, anyhow::Error> {
    match SecretBook::try_load(Some(path)) {
        Ok(book) => Ok(book),
        Err(CliError::Io(err)) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                info!("No secret book found at {}", path.display());
                Ok(SecretBook::default())
            } else {
                Err(anyhow!("Error reading secret book: {err}"))
            }
        }
        Err(err) => Err(anyhow!("Secret book error: {err}")),
    }
}
