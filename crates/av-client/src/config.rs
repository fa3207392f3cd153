use std::env;

/// Backend connection settings, loaded from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn load() -> Self {
        // A .env file is optional; real environment variables win either way.
        let _ = dotenvy::dotenv();

        let base_url = env::var("ARCHIVISION_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

        Self { base_url }
    }
}
