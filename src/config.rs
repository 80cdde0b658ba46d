use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: String,
    /// Force every panel client into mock mode regardless of credentials.
    /// Set via PANELSYNC_FORCE_MOCK. Mock mode is otherwise auto-detected
    /// from test credentials only.
    pub force_mock: bool,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let force_mock = std::env::var("PANELSYNC_FORCE_MOCK")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if force_mock {
        let env_mode = std::env::var("PANELSYNC_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "PANELSYNC_FORCE_MOCK is set in production. \
                 Mock mode serves a fixture catalog and must never shadow live providers."
            );
        }
        eprintln!("⚠️  PANELSYNC_FORCE_MOCK is set — all panel calls will return fixture data.");
    }

    Ok(Config {
        database_url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/panelsync".into()),
        force_mock,
    })
}
