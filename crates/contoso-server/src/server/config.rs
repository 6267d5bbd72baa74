use anyhow::bail;
use clap::Parser;
use contoso_core::stream::MAX_DELAY;
use core::time::Duration;

/// Text streamed by `/stream` when no `message` is given.
pub const DEFAULT_MESSAGE: &str =
    "Hola, soy un LLM de ejemplo. Estoy transmitiendo este mensaje palabra por palabra.";

/// Prompt assumed by `/generate_stream` when none is given.
pub const DEFAULT_PROMPT: &str = "Dame una respuesta breve simulada por un LLM.";

/// Fixed body streamed by `/generate_stream`.
pub const GENERATED_RESPONSE: &str = "Esta es una respuesta simulada como si fuera un LLM.";

/// Runtime configuration for the `contoso-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is honored), with defaults matching the demo deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "contoso-server",
    version,
    about = "Contoso Banking demo API with word-by-word text streaming"
)]
pub struct CliArgs {
    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:8000" or "/tmp/contoso.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8000"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,

    /// Pause between words on `/stream` when the request has no `delay_ms`.
    ///
    /// Environment variable: `DEFAULT_DELAY_MS`
    #[arg(long, env = "DEFAULT_DELAY_MS", default_value_t = 150)]
    pub default_delay_ms: u64,

    /// Largest `delay_ms` a client may request. Cannot exceed 5000.
    ///
    /// Environment variable: `MAX_DELAY_MS`
    #[arg(long, env = "MAX_DELAY_MS", default_value_t = 5000)]
    pub max_delay_ms: u64,

    /// Pause between words on `/generate_stream`.
    ///
    /// Environment variable: `GENERATE_DELAY_MS`
    #[arg(long, env = "GENERATE_DELAY_MS", default_value_t = 300)]
    pub generate_delay_ms: u64,

    /// Number of chunks buffered between a session and the HTTP body.
    ///
    /// Keep this small: every buffered chunk is one a disconnected client
    /// will never read, and a deep buffer lets the emitter run ahead of what
    /// the client has actually received.
    ///
    /// Environment variable: `STREAM_BUFFER_SIZE`
    #[arg(long, env = "STREAM_BUFFER_SIZE", default_value_t = 1)]
    pub stream_buffer_size: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub uds: bool,
    pub default_delay: Duration,
    pub max_delay: Duration,
    pub generate_delay: Duration,
    pub stream_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_addr: String::from("0.0.0.0:8000"),
            uds: false,
            default_delay: Duration::from_millis(150),
            max_delay: MAX_DELAY,
            generate_delay: Duration::from_millis(300),
            stream_buffer_size: 1,
        }
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let max_delay = Duration::from_millis(args.max_delay_ms);
        if max_delay > MAX_DELAY {
            bail!(
                "MAX_DELAY_MS ({}) exceeds the hard ceiling of {} ms",
                args.max_delay_ms,
                MAX_DELAY.as_millis()
            );
        }

        if args.default_delay_ms > args.max_delay_ms {
            bail!(
                "DEFAULT_DELAY_MS ({}) exceeds MAX_DELAY_MS ({})",
                args.default_delay_ms,
                args.max_delay_ms
            );
        }

        if args.generate_delay_ms > args.max_delay_ms {
            bail!(
                "GENERATE_DELAY_MS ({}) exceeds MAX_DELAY_MS ({})",
                args.generate_delay_ms,
                args.max_delay_ms
            );
        }

        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            uds: args.uds,
            default_delay: Duration::from_millis(args.default_delay_ms),
            max_delay,
            generate_delay: Duration::from_millis(args.generate_delay_ms),
            stream_buffer_size: args.stream_buffer_size,
        })
    }
}
