use crate::error::CliError;
use libatmen::cryptography::{Secret, SecretError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Labelled swap secrets, stored as hex in a YAML file.
///
/// The file holds secrets in the clear. Keep it somewhere only you can read.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SecretBook {
    pub secrets: BTreeMap<String, String>,
}

impl SecretBook {
    pub fn try_load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, CliError> {
        load_secret_book(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        save_secret_book(path, self)
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.secrets.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<Result<Secret, SecretError>> {
        self.secrets.get(label).map(|hex| Secret::from_hex(hex))
    }

    pub fn insert(&mut self, label: String, secret: &Secret) -> Option<String> {
        self.secrets.insert(label, secret.as_hex())
    }

    pub fn remove<S: AsRef<str>>(&mut self, label: S) -> Option<String> {
        self.secrets.remove(label.as_ref())
    }

    pub fn labels(&self) -> impl Iterator<Item = &String> {
        self.secrets.keys()
    }
}

pub fn default_secret_book_path() -> PathBuf {
    let mut home = std::env::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.push(".atmen");
    home.push("secrets.yml");
    home
}

pub fn load_secret_book<P: AsRef<Path>>(path: Option<P>) -> Result<SecretBook, CliError> {
    let path = path.map(|p| p.as_ref().to_path_buf()).unwrap_or_else(default_secret_book_path);
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let book = serde_yml::from_reader(reader)?;
    Ok(book)
}

pub fn save_secret_book<P: AsRef<Path>>(path: P, book: &SecretBook) -> Result<(), CliError> {
    // Create directory path if required
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_yml::to_writer(writer, book)?;
    Ok(())
}
