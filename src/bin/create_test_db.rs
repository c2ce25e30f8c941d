//! A utility for creating a seeded database for manual testing.

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use pocketbook::{
    AccountKind, NewAccountData, NewTransactionData, TransactionKind, create_account,
    create_owner, create_transaction, initialize_db,
};

/// A utility for creating a test database for the pocketbook API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The API key for the seeded owner.
    #[arg(long, default_value = "test")]
    api_key: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test owner with API key {:?}...", args.api_key);
    let owner = create_owner(&args.api_key, &conn)?;

    let checking = create_account(
        owner.id,
        NewAccountData {
            name: "Everyday Checking".to_owned(),
            kind: AccountKind::Checking,
            balance: "1250.75".to_owned(),
            is_default: None,
        },
        &conn,
    )?;

    create_account(
        owner.id,
        NewAccountData {
            name: "Rainy Day Savings".to_owned(),
            kind: AccountKind::Savings,
            balance: "8000".to_owned(),
            is_default: Some(false),
        },
        &conn,
    )?;

    create_transaction(
        owner.id,
        NewTransactionData {
            account_id: checking.id,
            amount: 82.40,
            date: date!(2025 - 06 - 02),
            kind: TransactionKind::Expense,
            category: "groceries".to_owned(),
            description: Some("weekly shop".to_owned()),
        },
        &conn,
    )?;

    create_transaction(
        owner.id,
        NewTransactionData {
            account_id: checking.id,
            amount: 2400.0,
            date: date!(2025 - 06 - 01),
            kind: TransactionKind::Income,
            category: "salary".to_owned(),
            description: None,
        },
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
