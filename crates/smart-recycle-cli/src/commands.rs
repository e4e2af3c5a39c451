use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use tracing::warn;

use smart_recycle_core::auth::Delay;
use smart_recycle_core::{
    Config, DemoAccount, Identity, KeyValueStore, LoginCredentials, RegisterData, SessionManager,
    SessionUser,
};

/// Environment variable pre-filling the login email
const EMAIL_ENV: &str = "SMART_RECYCLE_EMAIL";

/// Environment variable pre-filling the login password
const PASSWORD_ENV: &str = "SMART_RECYCLE_PASSWORD";

pub async fn login<S, D>(
    manager: &mut SessionManager<S, D>,
    config: &mut Config,
    email: Option<String>,
    demo: Option<&str>,
) -> Result<()>
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    let credentials = match demo {
        Some(name) => DemoAccount::from_name(name)
            .map(|account| account.credentials())
            .ok_or_else(|| anyhow!("Unknown demo account '{}' (use admin or user)", name))?,
        None => {
            let remembered = std::env::var(EMAIL_ENV)
                .ok()
                .or_else(|| config.last_email.clone());
            let email = match email {
                Some(email) => email,
                None => prompt_with_default("Email", remembered.as_deref())?,
            };
            let password = match std::env::var(PASSWORD_ENV) {
                Ok(password) if !password.is_empty() => password,
                _ => prompt_password("Password: ")?,
            };
            LoginCredentials::new(email, password)
        }
    };

    eprintln!("Signing in...");
    if !manager.login(&credentials).await {
        bail!("Invalid email or password. Please try again.");
    }

    config.last_email = Some(credentials.email.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if let Some(user) = manager.user() {
        println!("Welcome back, {}! Successfully logged in to Smart Recycle.", user.name);
    }
    Ok(())
}

pub async fn register<S, D>(
    manager: &mut SessionManager<S, D>,
    name: String,
    email: String,
    phone: String,
    address: String,
) -> Result<()>
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    let password = prompt_password("Create a password: ")?;
    let data = registration_data(name, email, password, phone, address)?;

    eprintln!("Creating account...");
    if !manager.register(data).await {
        bail!("Registration failed. User with this email already exists.");
    }
    println!("Account created successfully. Please login to continue.");
    Ok(())
}

/// Reject blank form fields before they reach the session manager
fn registration_data(
    name: String,
    email: String,
    password: String,
    phone: String,
    address: String,
) -> Result<RegisterData> {
    let data = RegisterData {
        name,
        email,
        password,
        phone,
        address,
    };
    if data.password.is_empty() {
        bail!("Password must not be empty");
    }
    if !data.is_complete() {
        bail!("Name, email, phone and address are all required");
    }
    Ok(data)
}

pub fn logout<S, D>(manager: &mut SessionManager<S, D>)
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    manager.logout();
    println!("Logged out.");
}

pub fn whoami<S, D>(manager: &SessionManager<S, D>) -> Result<()>
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    let user = manager.user().ok_or_else(|| anyhow!("Not logged in"))?;
    println!("{}", describe_user(&user));
    Ok(())
}

pub fn points<S, D>(manager: &mut SessionManager<S, D>, value: i64) -> Result<()>
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    if !manager.is_authenticated() {
        bail!("Not logged in");
    }
    manager
        .update_points(value)
        .context("Failed to update points")?;
    println!("Points set to {}.", value);
    Ok(())
}

pub fn users<S, D>(manager: &SessionManager<S, D>) -> Result<()>
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    let listing: Vec<serde_json::Value> = manager
        .credentials()
        .all()
        .iter()
        .map(public_view)
        .collect::<Result<_>>()?;
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

/// JSON of an identity with its secret stripped
fn public_view(identity: &Identity) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(identity.to_session())?)
}

fn describe_user(user: &SessionUser) -> String {
    let role = if user.is_admin { "admin" } else { "member" };
    format!(
        "{} <{}> ({})\n  phone:   {}\n  address: {}\n  points:  {}\n  joined:  {}",
        user.name,
        user.email,
        role,
        user.phone,
        user.address,
        user.points,
        user.created_at.format("%b %d, %Y"),
    )
}

fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(value) => print!("{} [{}]: ", label, value),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(pick_input(input.trim(), default))
}

/// Typed input wins; an empty line falls back to the default
fn pick_input(input: &str, default: Option<&str>) -> String {
    if input.is_empty() {
        default.unwrap_or_default().to_string()
    } else {
        input.to_string()
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt)?;
    Ok(password)
}
