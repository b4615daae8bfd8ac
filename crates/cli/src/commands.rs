//! CLI commands

use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use synvia_infra::{ApiRequest, LoginOutcome};
use tracing::info;

use crate::context::CliContext;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        #[arg(long, env = "SYNVIA_EMAIL")]
        email: String,

        #[arg(long, env = "SYNVIA_PASSWORD", hide_env_values = true)]
        password: String,

        /// One-time code from the authenticator app
        #[arg(long)]
        otp: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Send an authenticated request and print the response body
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Path relative to the API base URL, e.g. `/produtos`
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Extra header as `Name: value` (repeatable)
        #[arg(long = "header", short = 'H')]
        headers: Vec<String>,
    },

    /// Check whether the signed-in user may open a route
    CanAccess { route: String },

    /// Print the effective configuration
    Config,
}

impl Commands {
    /// Command name used as the route the CLI is "on" while it runs
    pub fn route(&self) -> &str {
        match self {
            Self::Login { .. } => "/login",
            Self::CanAccess { route } => route,
            _ => "/",
        }
    }

    pub async fn execute(self, ctx: &CliContext, out: &mut dyn Write) -> Result<()> {
        match self {
            Self::Login { email, password, otp } => login(ctx, &email, &password, otp.as_deref(), out).await,
            Self::Logout => {
                ctx.auth.logout()?;
                writeln!(out, "Sessão encerrada.")?;
                Ok(())
            }
            Self::Whoami => whoami(ctx, out),
            Self::Request { method, path, body, headers } => {
                let request = build_request(&method, &path, body.as_deref(), &headers)?;
                request_command(ctx, request, out).await
            }
            Self::CanAccess { route } => can_access(ctx, &route, out),
            Self::Config => {
                writeln!(out, "{}", serde_json::to_string_pretty(&ctx.config)?)?;
                Ok(())
            }
        }
    }
}

async fn login(
    ctx: &CliContext,
    email: &str,
    password: &str,
    otp: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    match ctx.auth.login(email, password, otp).await? {
        LoginOutcome::Authenticated(user) => {
            writeln!(out, "Bem-vindo, {} ({}).", user.name, user.role_display_name())?;
            Ok(())
        }
        LoginOutcome::MfaRequired => {
            bail!("código de verificação necessário; repita com --otp <CÓDIGO>")
        }
        LoginOutcome::MfaSetupRequired { secret, otpauth_url, .. } => {
            writeln!(out, "Configure o autenticador antes de entrar.")?;
            if let Some(secret) = secret {
                writeln!(out, "Chave secreta: {secret}")?;
            }
            if let Some(url) = otpauth_url {
                writeln!(out, "URL: {url}")?;
            }
            bail!("configuração de autenticação em dois fatores pendente")
        }
        LoginOutcome::Rejected(message) => bail!(message),
    }
}

fn whoami(ctx: &CliContext, out: &mut dyn Write) -> Result<()> {
    let Some(user) = ctx.auth.restore()? else {
        bail!("nenhuma sessão ativa; use `synvia login`");
    };

    writeln!(out, "{} <{}>", user.name, user.email)?;
    writeln!(out, "Perfil: {}", user.role_display_name())?;
    writeln!(out, "Permissões: {}", user.permissions.join(", "))?;
    Ok(())
}

fn can_access(ctx: &CliContext, route: &str, out: &mut dyn Write) -> Result<()> {
    let Some(user) = ctx.auth.current_user()? else {
        bail!("nenhuma sessão ativa; use `synvia login`");
    };

    if user.can_access(route) {
        writeln!(out, "permitido: {route}")?;
        Ok(())
    } else {
        writeln!(out, "negado: {route} (perfil {})", user.role_display_name())?;
        Err(anyhow!("acesso negado a {route}"))
    }
}

async fn request_command(ctx: &CliContext, request: ApiRequest, out: &mut dyn Write) -> Result<()> {
    let response = ctx.client().execute(request).await?;
    let status = response.status();
    let text = response.text().await.context("failed to read response body")?;
    info!(%status, bytes = text.len(), "response received");

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?,
        Err(_) if text.is_empty() => {}
        Err(_) => writeln!(out, "{text}")?,
    }
    Ok(())
}

fn build_request(method: &str, path: &str, body: Option<&str>, headers: &[String]) -> Result<ApiRequest> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{method}'"))?;
    let mut request = ApiRequest::new(method, path);

    if let Some(body) = body {
        let json: serde_json::Value = serde_json::from_str(body).context("--body is not valid JSON")?;
        request = request.body(json);
    }

    for raw in headers {
        let (name, value) = parse_header(raw)?;
        request = request.header(name, value);
    }

    Ok(request)
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header '{raw}' must look like 'Name: value'"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .with_context(|| format!("invalid header name in '{raw}'"))?;
    let value = HeaderValue::from_str(value.trim())
        .with_context(|| format!("invalid header value in '{raw}'"))?;
    Ok((name, value))
}
