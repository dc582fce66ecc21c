use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{AccessKeyHash, ValidatedAccessKey, initialize_db, set_access_key};

/// A utility for setting or changing the access key used to log in.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let Some(access_key_hash) = get_new_access_key_hash() else {
        return Ok(());
    };

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;
    set_access_key(&access_key_hash, &connection)?;

    println!("Access key updated successfully!");

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            print_error("Database path must include a file extension (e.g., 'expenses.db').");
            exit(1);
        }
    }

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

/// Prompt until the owner enters the same strong access key twice.
///
/// Returns `None` if stdin is closed or cannot be read.
fn get_new_access_key_hash() -> Option<AccessKeyHash> {
    loop {
        println!();

        let first_key = prompt("Enter a new access key: ")?;

        let validated_key = match ValidatedAccessKey::new(&first_key) {
            Ok(validated_key) => validated_key,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_key = prompt("Enter the same access key again: ")?;

        if first_key != second_key {
            print_error("Access keys must match, try again.");
            continue;
        }

        match AccessKeyHash::new(validated_key, AccessKeyHash::DEFAULT_COST) {
            Ok(access_key_hash) => return Some(access_key_hash),
            Err(error) => print_error(format!("Could not hash access key: {error}. Try again.")),
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read access key from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}
