//! CLI commands

use anyhow::{Result, bail};
use clap::Subcommand;
use sc_login_auth::{AuthOutcome, AuthenticationService, Backends};
use sc_login_core::storage::MemoryCookieStore;
use sc_login_core::{AuthConfig, BrandId, Environment};
use sc_login_http::TokenServiceClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config;
use crate::navigation::PrintNavigator;
use crate::store::FileDurableStore;

#[derive(Subcommand)]
pub enum Commands {
    /// Show how an environment resolves
    Env {
        /// Environment name (defaults to the configured one)
        name: Option<String>,
    },

    /// Log in with explicit credentials and validate the new token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SC_LOGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Validate the stored token against the token service
    Validate {
        /// Return destination passed to the login page on failure
        #[arg(long)]
        redirect: Option<String>,
    },

    /// Invalidate the stored token and clear the session
    Logout {
        /// Do not print the login page afterwards
        #[arg(long)]
        silent: bool,
    },

    /// Show the stored session
    Show {
        /// Print the token itself
        #[arg(long)]
        reveal: bool,
    },

    /// Manage the stored brand
    Brand {
        #[command(subcommand)]
        command: BrandCommands,
    },

    /// Generate default configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum BrandCommands {
    /// Store a brand identifier
    Set { id: String },

    /// Remove the stored brand
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Output file path (defaults to <data dir>/config.json)
        output: Option<PathBuf>,
    },
}

/// Options shared by every command
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub environment: Option<String>,
    pub token_service: Option<String>,
    pub timeout: u64,
}

impl Context {
    fn auth_config(&self) -> Result<AuthConfig> {
        let mut config = config::load_config(self.config.as_deref(), &self.data_dir)?;
        if let Some(environment) = &self.environment {
            config.environment = environment.clone();
        }
        if let Some(token_service) = &self.token_service {
            config.token_service = Some(token_service.clone());
        }
        Ok(config)
    }

    fn service(&self) -> Result<AuthenticationService> {
        let config = self.auth_config()?;
        let durable = FileDurableStore::new(session_path(&self.data_dir));
        info!(path = %durable.path().display(), "Using session file");

        let backends = Backends {
            durable: Arc::new(durable),
            cookies: Arc::new(MemoryCookieStore::new()),
            navigator: Arc::new(PrintNavigator),
            router: Arc::new(PrintNavigator),
        };

        let mut client = TokenServiceClient::builder()
            .endpoint(config.environment().token_endpoint())
            .user_agent(user_agent());
        if self.timeout > 0 {
            client = client.timeout(Duration::from_secs(self.timeout));
        }

        Ok(AuthenticationService::new(&config, backends)?
            .with_client(client.build()?)
            .with_user_agent(user_agent()))
    }
}

fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join("session.json")
}

fn user_agent() -> String {
    format!("sc-login/{}", env!("CARGO_PKG_VERSION"))
}

impl Commands {
    pub async fn execute(self, ctx: Context) -> Result<()> {
        match self {
            Commands::Env { name } => show_environment(&ctx, name),
            Commands::Login { email, password } => {
                let service = ctx.service()?;
                let credentials = service.silent_login(&email, &password).await?;
                println!(
                    "Logged in to {} as {}",
                    service.environment().name(),
                    credentials.user.email().unwrap_or(email.as_str())
                );
                Ok(())
            }
            Commands::Validate { redirect } => {
                let service = ctx.service()?;
                match service.authenticate(redirect.as_deref()).await {
                    AuthOutcome::Authenticated(credentials) => {
                        println!(
                            "Session valid for {}",
                            credentials.user.email().unwrap_or("unknown user")
                        );
                        Ok(())
                    }
                    AuthOutcome::Redirected { reason, .. } => bail!("Session rejected: {reason}"),
                }
            }
            Commands::Logout { silent } => {
                let service = ctx.service()?;
                if silent {
                    service.silent_logout().await;
                } else {
                    service.logout().await;
                }
                println!("Logged out");
                Ok(())
            }
            Commands::Show { reveal } => {
                let service = ctx.service()?;
                show_session(&service, reveal)
            }
            Commands::Brand { command } => command.execute(&ctx),
            Commands::Config { command } => command.execute(&ctx),
        }
    }
}

impl BrandCommands {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let service = ctx.service()?;
        match self {
            BrandCommands::Set { id } => {
                service.set_brand(&BrandId::new(id))?;
                println!("Brand stored");
            }
            BrandCommands::Clear => {
                service.clear_brand()?;
                println!("Brand cleared");
            }
        }
        Ok(())
    }
}

impl ConfigCommands {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            ConfigCommands::Init { output } => {
                let config_path = output.unwrap_or_else(|| ctx.data_dir.join("config.json"));

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                config::save_config(&AuthConfig::default(), &config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
        }
    }
}

fn show_environment(ctx: &Context, name: Option<String>) -> Result<()> {
    let config = ctx.auth_config()?;
    let env = match name {
        Some(name) => Environment::resolve(&name, &config.overrides()),
        None => config.environment(),
    };

    println!("Environment:     {}", env.name());
    println!("Solution Center: {}", env.solution_center_url());
    println!("Token endpoint:  {}", env.token_endpoint());
    println!("Cookie domain:   {}", env.domain());
    println!("Secure cookies:  {}", env.is_secure());
    Ok(())
}

fn show_session(service: &AuthenticationService, reveal: bool) -> Result<()> {
    match service.token() {
        Some(token) if reveal => println!("Token: {token}"),
        Some(token) => println!("Token: {token:?}"),
        None => println!("Token: none"),
    }

    match service.user() {
        Some(user) => println!("User:  {}", serde_json::to_string_pretty(user.fields())?),
        None => println!("User:  none"),
    }

    match service.brand() {
        Some(brand) => println!("Brand: {brand}"),
        None => println!("Brand: none"),
    }
    Ok(())
}
