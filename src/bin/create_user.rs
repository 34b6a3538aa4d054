use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;

use cashbook_rs::{
    NewUser, PasswordHash, Role, SQLiteUserStore, UserStore, ValidatedPassword, initialize_db,
};

/// Add a user to the cashbook_rs database.
///
/// The password is read from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The user's display name.
    #[arg(long)]
    name: String,

    /// The email address the user logs in with.
    #[arg(long)]
    email: String,

    /// An optional contact phone number.
    #[arg(long)]
    phone: Option<String>,

    /// Either USER or ADMIN.
    #[arg(long, default_value = "ADMIN")]
    role: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let role: Role = args.role.parse()?;

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;
    let user_store = SQLiteUserStore::new(Arc::new(Mutex::new(conn)));

    let password_hash = loop {
        let password = rpassword::prompt_password("Password: ")?;
        let confirmation = rpassword::prompt_password("Confirm password: ")?;

        if password != confirmation {
            eprintln!("Passwords do not match, try again.");
            continue;
        }

        match ValidatedPassword::new(&password) {
            Ok(password) => break PasswordHash::new(password, PasswordHash::DEFAULT_COST)?,
            Err(error) => eprintln!("{error}"),
        }
    };

    let user = user_store.create(NewUser {
        name: args.name,
        email: args.email,
        phone: args.phone,
        role,
        password_hash,
    })?;

    println!("Created {} user {} <{}> with ID {}", user.role, user.name, user.email, user.id);

    Ok(())
}
