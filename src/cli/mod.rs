use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Chat relay for the Naga Codex website", long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Maximum chat requests per minute across all clients. 0 disables the limit.
    #[arg(long, env = "CHAT_RATE_LIMIT_PER_MINUTE", default_value = "0")]
    pub rate_limit_per_minute: u32,

    // --- Chat Provider Args ---
    /// API key for the chat provider. Without it every chat request fails with a configuration error.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name for chat completion (e.g., gpt-4o-mini, gpt-4o)
    #[arg(long, env = "CHAT_MODEL", default_value = crate::llm::DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Base URL of the chat provider API; `/chat/completions` is appended.
    #[arg(long, env = "CHAT_BASE_URL", default_value = crate::llm::DEFAULT_BASE_URL)]
    pub chat_base_url: String,

    /// Seconds to wait for the chat provider before giving up.
    #[arg(
        long,
        env = "CHAT_REQUEST_TIMEOUT_SECS",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,

    /// Optional path to a text file replacing the built-in assistant persona.
    #[arg(long, env = "PERSONA_PATH")]
    pub persona_path: Option<String>,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
