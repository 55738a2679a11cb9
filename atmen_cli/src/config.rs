use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atomic swaps on elliptic-curve commitments.
///
/// Party-side tooling: manage swap secrets, derive commitment ids and mirrors, and build reveal operations for
/// relayers.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Path to the secret book. The default is `$HOME/.atmen/secrets.yml`.
    #[arg(long = "secret-book", short = 's', env = "ATMEN_SECRET_BOOK")]
    pub secret_book: Option<PathBuf>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create, list or delete the swap secrets in the secret book.
    #[command(subcommand, name = "secret")]
    Secret(SecretCommand),
    /// Print the commitment point and id for a secret.
    #[command(name = "commit")]
    Commit {
        /// A hex secret, or the label of a secret in the secret book.
        secret: String,
    },
    /// Derive the mirror of a commitment point under a shared secret.
    #[command(name = "mirror")]
    Mirror {
        /// The x coordinate of the commitment point, in hex.
        qx: String,
        /// The y coordinate of the commitment point, in hex.
        qy: String,
        /// A hex secret, or the label of a secret in the secret book.
        shared_secret: String,
    },
    /// Compute the secret that opens a mirror swap.
    #[command(name = "combine")]
    Combine {
        /// The secret revealed when the original swap closed.
        secret: String,
        /// The shared secret the mirror was derived with.
        shared_secret: String,
    },
    /// Build the call data of a sponsored reveal operation.
    #[command(name = "reveal-payload", alias = "reveal")]
    RevealPayload {
        /// The commitment id of the swap to close.
        id: String,
        /// A hex secret, or the label of a secret in the secret book.
        secret: String,
    },
    /// Print the 4-byte selector of a function signature, e.g. `reveal(bytes32,bytes32)`.
    #[command(name = "selector")]
    Selector { signature: String },
}

#[derive(Debug, Subcommand)]
pub enum SecretCommand {
    /// Generate a new random secret.
    #[command(name = "new", alias = "create")]
    Create {
        /// The label to store the secret under. If omitted, the commitment id is used.
        label: Option<String>,
    },
    /// List the stored secrets and their commitment ids.
    #[command(name = "list", alias = "ls")]
    List,
    /// Delete a secret.
    #[command(name = "delete", alias = "del", alias = "rm")]
    Delete { label: String },
}

pub struct GlobalOptions {
    pub secret_book: Option<PathBuf>,
}

impl Config {
    pub fn to_parts(self) -> (GlobalOptions, CliCommand) {
        let global = GlobalOptions { secret_book: self.secret_book };
        (global, self.command)
    }
}
