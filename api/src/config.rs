//! Startup configuration. Environment variables are read once in `main`
//! and turned into an explicit [`AppConfig`] that handlers receive through
//! application state — nothing reads the environment at request time.

/// Default completion model when `OPENAI_MODEL` is not set.
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: String,
    pub openai: Option<OpenAiConfig>,
    pub drive: Option<DriveConfig>,
}

/// Completion-API credentials and model selection.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

/// Google Drive credentials plus the destination folder.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub auth: DriveAuthConfig,
    pub folder_id: String,
}

/// The two credential shapes the deployment has used. OAuth (personal
/// account with a refresh token) is the current one and wins when both
/// sets of variables are present.
#[derive(Debug, Clone)]
pub enum DriveAuthConfig {
    OAuth {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    ServiceAccount {
        client_email: String,
        private_key: String,
    },
}

impl DriveAuthConfig {
    pub fn mode(&self) -> &'static str {
        match self {
            DriveAuthConfig::OAuth { .. } => "oauth",
            DriveAuthConfig::ServiceAccount { .. } => "service_account",
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env_var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let environment = env_var("APP_ENV").unwrap_or_else(|| "development".to_string());

        let openai = env_var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            model: env_var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
        });

        let drive = Self::drive_from_env();

        AppConfig {
            port,
            environment,
            openai,
            drive,
        }
    }

    fn drive_from_env() -> Option<DriveConfig> {
        let folder_id = env_var("GOOGLE_DRIVE_FOLDER_ID").unwrap_or_else(|| "root".to_string());

        if let (Some(client_id), Some(client_secret), Some(refresh_token)) = (
            env_var("GOOGLE_CLIENT_ID"),
            env_var("GOOGLE_CLIENT_SECRET"),
            env_var("GOOGLE_REFRESH_TOKEN"),
        ) {
            return Some(DriveConfig {
                auth: DriveAuthConfig::OAuth {
                    client_id,
                    client_secret,
                    refresh_token,
                },
                folder_id,
            });
        }

        if let (Some(client_email), Some(private_key)) = (
            env_var("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
            env_var("GOOGLE_PRIVATE_KEY"),
        ) {
            // Keys pasted into env vars arrive with literal \n escapes
            let private_key = private_key.replace("\\n", "\n");
            return Some(DriveConfig {
                auth: DriveAuthConfig::ServiceAccount {
                    client_email,
                    private_key,
                },
                folder_id,
            });
        }

        None
    }
}
