use serde::Deserialize;

/// Process-level configuration, read once at startup. Credentials for the
/// OpenAI-compatible endpoint are picked up by the client from the standard
/// `OPENAI_API_KEY` / `OPENAI_API_BASE` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub chat: ChatModelConfig,
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatModelConfig {
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Unset means the in-memory index is used instead of Qdrant.
    pub qdrant_url: Option<String>,
    pub collection: String,
    pub top_k: usize,
    pub timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            embedding: EmbeddingConfig {
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
                timeout_seconds: 30,
            },
            chat: ChatModelConfig {
                model: "gpt-4o-mini".to_string(),
                timeout_seconds: 60,
            },
            index: IndexConfig {
                qdrant_url: None,
                collection: "rate-my-professor".to_string(),
                top_k: 3,
                timeout_seconds: 30,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", defaults.server.host),
                port: env_parsed("SERVER_PORT", defaults.server.port),
            },
            embedding: EmbeddingConfig {
                model: env_or("EMBEDDING_MODEL", defaults.embedding.model),
                dimension: env_parsed("EMBEDDING_DIMENSION", defaults.embedding.dimension),
                timeout_seconds: env_parsed(
                    "EMBED_TIMEOUT_SECONDS",
                    defaults.embedding.timeout_seconds,
                ),
            },
            chat: ChatModelConfig {
                model: env_or("CHAT_MODEL", defaults.chat.model),
                timeout_seconds: env_parsed(
                    "GENERATION_TIMEOUT_SECONDS",
                    defaults.chat.timeout_seconds,
                ),
            },
            index: IndexConfig {
                qdrant_url: std::env::var("QDRANT_URL").ok(),
                collection: env_or("QDRANT_COLLECTION", defaults.index.collection),
                top_k: env_parsed("RAG_TOP_K", defaults.index.top_k),
                timeout_seconds: env_parsed(
                    "QUERY_TIMEOUT_SECONDS",
                    defaults.index.timeout_seconds,
                ),
            },
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.index.collection, "rate-my-professor");
        assert_eq!(config.index.top_k, 3);
    }
}
