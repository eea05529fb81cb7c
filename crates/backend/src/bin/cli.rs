use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::Client;
use shared_types::{pattern, ErrorResponse, PatternRequest, PatternResult};

#[derive(Parser)]
#[command(name = "pattern-cli")]
#[command(about = "Print diamond patterns locally or from a running dashboard")]
#[command(
    long_about = "A command-line companion to the pattern dashboard.\n\n\
    Renders the same diamond the dashboard shows, either in-process or by\n\
    calling the server's JSON API with a session token."
)]
struct Cli {
    /// Dashboard server URL to connect to.
    ///
    /// Only used by `fetch`.
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:5000",
        env = "PATTERN_API_URL"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pattern for N without contacting a server
    ///
    /// N is taken as typed: values outside 1-100 are clamped, anything that
    /// is not an integer is rejected.
    Generate {
        /// Pattern size
        #[arg(allow_hyphen_values = true)]
        n: String,
    },

    /// Ask a running dashboard for the pattern for N
    Fetch {
        /// Pattern size
        #[arg(allow_hyphen_values = true)]
        n: String,

        /// Session token (the value of the `auth_token` cookie)
        #[arg(short, long, env = "PATTERN_API_TOKEN")]
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { n } => pattern::generate_pattern(&n),
        Commands::Fetch { n, token } => fetch(&Client::new(), &cli.base_url, &n, &token).await?,
    };

    match result {
        PatternResult::Success(success) => {
            for line in success.pattern {
                println!("{}", line);
            }
            Ok(())
        }
        PatternResult::Failure(failure) => bail!(failure.error),
    }
}

async fn fetch(
    client: &Client,
    base_url: &str,
    n: &str,
    token: &str,
) -> anyhow::Result<PatternResult> {
    let url = format!("{}/api/pattern", base_url.trim_end_matches('/'));
    let response = client
        .post(&url)
        .bearer_auth(token)
        .json(&PatternRequest { n: n.to_string() })
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    if status.is_success() || status == reqwest::StatusCode::BAD_REQUEST {
        return response
            .json()
            .await
            .context("Server returned an unexpected pattern response");
    }

    match response.json::<ErrorResponse>().await {
        Ok(body) => bail!("Server rejected the request ({}): {}", status, body.error),
        Err(_) => bail!("Server rejected the request ({})", status),
    }
}
