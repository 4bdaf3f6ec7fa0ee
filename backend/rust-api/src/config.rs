use serde::Deserialize;
use std::env;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_QUESTION_COUNT: usize = 10;
const MAX_QUESTION_COUNT: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub jwt_secret: String,
    pub port: u16,
    /// Allowed browser origin; any origin when unset.
    pub cors_origin: Option<String>,
    pub default_question_count: usize,
    pub max_question_count: usize,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml, then APP__SECTION__KEY overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGODB_URI"))
            .unwrap_or_else(|_| {
                eprintln!("WARNING: MONGODB_URI not set, using local MongoDB");
                "mongodb://localhost:27017".to_string()
            });

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "studymed".to_string());

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::NotFound(
                    "JWT_SECRET must be set in production".to_string(),
                ))
            }
            Err(_) => {
                eprintln!("WARNING: Using default JWT_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let port = read_number(&settings, "server.port", "PORT")?.unwrap_or(DEFAULT_PORT);

        let cors_origin = settings
            .get_string("cors.allowed_origin")
            .or_else(|_| env::var("CORS_ORIGIN"))
            .ok()
            .filter(|origin| !origin.is_empty());

        let default_question_count = read_number(
            &settings,
            "study.default_question_count",
            "STUDY_DEFAULT_QUESTION_COUNT",
        )?
        .unwrap_or(DEFAULT_QUESTION_COUNT);

        let max_question_count = read_number(
            &settings,
            "study.max_question_count",
            "STUDY_MAX_QUESTION_COUNT",
        )?
        .unwrap_or(MAX_QUESTION_COUNT)
        .max(1);

        Ok(Config {
            mongo_uri,
            mongo_database,
            jwt_secret,
            port,
            cors_origin,
            default_question_count,
            max_question_count,
        })
    }
}

/// Reads a numeric setting from the config sources, falling back to a plain
/// environment variable. A present but malformed value is an error.
fn read_number<T>(
    settings: &config::Config,
    key: &str,
    env_key: &str,
) -> Result<Option<T>, config::ConfigError>
where
    T: std::str::FromStr,
{
    let raw = match settings.get_string(key) {
        Ok(value) => Some(value),
        Err(_) => env::var(env_key).ok(),
    };

    raw.map(|value| {
        value.trim().parse::<T>().map_err(|_| {
            config::ConfigError::Message(format!("{} has invalid value '{}'", key, value))
        })
    })
    .transpose()
}
