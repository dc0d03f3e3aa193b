//! One-shot helper for wiring the backend's Google Drive credential:
//! print the consent URL, then exchange the authorization code for the
//! refresh token the server reads from `GOOGLE_REFRESH_TOKEN`.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;
use url::Url;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

#[derive(Parser)]
#[command(
    name = "eduplan",
    version,
    about = "Eduplan CLI — obtain the Google Drive refresh token for the backend"
)]
struct Cli {
    /// OAuth client id
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    client_id: String,

    /// OAuth client secret (needed for exchange-code)
    #[arg(long, env = "GOOGLE_CLIENT_SECRET")]
    client_secret: Option<String>,

    /// Redirect URI registered for the OAuth client
    #[arg(long, env = "GOOGLE_REDIRECT_URI", default_value = "http://localhost:3000")]
    redirect_uri: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the consent URL that authorizes Drive access
    AuthUrl,
    /// Exchange an authorization code for a refresh token
    ExchangeCode {
        /// The code from the redirect URL (after ?code=)
        code: String,
    },
}

#[derive(Deserialize)]
struct TokenExchangeResponse {
    refresh_token: Option<String>,
    access_token: Option<String>,
}

fn exit_error(message: &str) -> ! {
    let err = json!({
        "error": "cli_error",
        "message": message
    });
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
    std::process::exit(1);
}

/// Consent URL with offline access so Google returns a refresh token.
fn build_auth_url(client_id: &str, redirect_uri: &str) -> Url {
    let mut url = Url::parse(AUTH_ENDPOINT).expect("auth endpoint is a valid URL");
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", DRIVE_SCOPE)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent");
    url
}

async fn exchange_code(cli: &Cli, code: &str) {
    let Some(client_secret) = cli.client_secret.as_deref() else {
        exit_error("client_secret is required: pass --client-secret or set GOOGLE_CLIENT_SECRET");
    };

    let response = reqwest::Client::new()
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &cli.client_id),
            ("client_secret", client_secret),
            ("redirect_uri", &cli.redirect_uri),
        ])
        .send()
        .await
        .unwrap_or_else(|err| exit_error(&format!("token request failed: {err}")));

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        exit_error(&format!("token exchange failed ({status}): {body}"));
    }

    let tokens: TokenExchangeResponse = response
        .json()
        .await
        .unwrap_or_else(|err| exit_error(&format!("unexpected token response: {err}")));

    match tokens.refresh_token {
        Some(refresh_token) => {
            println!("Refresh token obtenido.\n");
            println!("Agrega a las variables de entorno del servidor:");
            println!("GOOGLE_REFRESH_TOKEN={refresh_token}");
        }
        None => {
            // Google omits the refresh token when consent was already granted
            exit_error(
                "no refresh_token in the response — revoke access at \
                 https://myaccount.google.com/permissions and run auth-url again",
            );
        }
    }

    if tokens.access_token.is_some() {
        println!("\n(El access token es de corta duración; el servidor lo renueva solo.)");
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match &cli.command {
        Commands::AuthUrl => {
            let url = build_auth_url(&cli.client_id, &cli.redirect_uri);
            println!("PASO 1: abre esta URL en tu navegador:\n");
            println!("{url}\n");
            println!("PASO 2: autoriza el acceso y copia el código de la URL de redirección");
            println!("        (viene después de ?code=)");
            println!("\nPASO 3: ejecuta:");
            println!("eduplan exchange-code TU_CODIGO");
        }
        Commands::ExchangeCode { code } => exchange_code(&cli, code).await,
    }
}
