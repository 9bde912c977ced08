use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::{Parser, Subcommand};
use frameqa_figma::DEFAULT_API_BASE;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "frameqa-mcp",
    version,
    author,
    about = "Design-QA middleware for Figma frames",
    long_about = "Serves design-QA tools (token compliance, WCAG contrast, spacing, hierarchy and inventories) over HTTP or stdio MCP, backed by the Figma REST API."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, global = true, env = "FIGMA_TOKEN", hide_env_values = true, help = "Figma personal access token")]
    pub figma_token: Option<String>,

    #[arg(long, global = true, env = "FIGMA_API_BASE", default_value = DEFAULT_API_BASE, help = "Figma REST API base URL")]
    pub api_base: String,

    #[arg(long, global = true, env = "FIGMA_TIMEOUT_SECS", default_value_t = 15, help = "Timeout for each Figma API call")]
    pub timeout_secs: u64,

    #[arg(long, global = true, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED), help = "HTTP bind address")]
    pub host: IpAddr,

    #[arg(short, long, global = true, env = "PORT", default_value_t = 3845, help = "HTTP port")]
    pub port: u16,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Serve the HTTP endpoints (default)")]
    Serve,
    #[command(about = "Serve MCP over stdin/stdout")]
    Stdio,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    /// The configured token; an empty value counts as unset.
    pub fn token(&self) -> Option<&str> {
        self.figma_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
