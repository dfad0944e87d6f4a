//! Create a RallyControl login.
//!
//! ```text
//! rallycontrol-createuser <username> [--role admin|operator|viewer] [--email <email>]
//! ```
//!
//! The password is read from `RALLYCONTROL_PASSWORD`, else from the first
//! line of stdin.

use std::io::BufRead;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rallycontrol_api::auth::password::{hash_password, validate_password_strength};
use rallycontrol_core::roles::{DEFAULT_ROLE, VALID_ROLES};
use rallycontrol_db::models::user::CreateUser;
use rallycontrol_db::repositories::UserRepo;

const USAGE: &str =
    "usage: rallycontrol-createuser <username> [--role admin|operator|viewer] [--email <email>]";

#[derive(Debug, PartialEq)]
struct Args {
    username: String,
    role: String,
    email: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut username = None;
    let mut role = DEFAULT_ROLE.to_string();
    let mut email = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--role" => role = args.next().ok_or("--role needs a value")?,
            "--email" => email = Some(args.next().ok_or("--email needs a value")?),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ if username.is_none() => username = Some(arg),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }

    if !VALID_ROLES.contains(&role.as_str()) {
        return Err(format!("unknown role '{role}'"));
    }
    Ok(Args {
        username: username.ok_or("missing username")?,
        role,
        email,
    })
}

fn read_password() -> std::io::Result<String> {
    if let Ok(password) = std::env::var("RALLYCONTROL_PASSWORD") {
        return Ok(password);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rallycontrol_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let password = read_password().expect("Failed to read password");
    if let Err(msg) = validate_password_strength(&password) {
        eprintln!("{msg}");
        std::process::exit(2);
    }
    let password_hash = hash_password(&password).expect("Password hashing failed");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = rallycontrol_db::create_pool(&database_url, 1)
        .await
        .expect("Failed to connect to database");
    rallycontrol_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: args.username,
            email: args.email,
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            role: args.role,
            is_active: true,
        },
    )
    .await
    .expect("Failed to create user");

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User created");
}
