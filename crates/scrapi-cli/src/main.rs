use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use scrapi_core::{
    ApiCredentials, ClientConfig, ConfigOverrides, GoogleOpts, Method, ScrapiClient, SearchOpts,
    UrlOpts,
};

#[derive(Parser)]
#[command(name = "scrapi", version, about = "Run scraping jobs against the scrapi backend")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Overall timeout in seconds (default: 50)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Seconds between status polls (default: 5)
    #[arg(long, global = true)]
    poll_interval: Option<u64>,

    /// Send one realtime request instead of running a job
    #[arg(long, global = true, default_value_t = false)]
    realtime: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// API username
    #[arg(long, env = "SCRAPI_USERNAME")]
    username: String,

    /// API password
    #[arg(long, env = "SCRAPI_PASSWORD", hide_env_values = true)]
    password: String,

    /// Job endpoint
    #[arg(long, env = "SCRAPI_BASE_URL")]
    base_url: String,

    /// Realtime endpoint (defaults to the job endpoint)
    #[arg(long, env = "SCRAPI_REALTIME_URL")]
    realtime_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a query on a search-engine source
    Search {
        /// Source name, e.g. "bing_search"
        #[arg(short, long)]
        source: String,

        /// Search query
        query: String,

        #[arg(long, default_value = "com")]
        domain: String,

        #[arg(long, default_value_t = 1)]
        start_page: i32,

        #[arg(long, default_value_t = 1)]
        pages: i32,

        #[arg(long, default_value_t = 10)]
        limit: i32,

        #[arg(long, default_value = "desktop")]
        user_agent: String,

        #[arg(long)]
        locale: Option<String>,

        /// Return structured data
        #[arg(long, default_value_t = false)]
        parse: bool,
    },

    /// Scrape a single URL
    Url {
        /// Source name, e.g. "amazon"
        #[arg(short, long)]
        source: String,

        /// Target URL
        url: String,

        /// Host the URL must belong to
        #[arg(long)]
        host: String,

        #[arg(long, default_value = "desktop")]
        user_agent: String,

        #[arg(long, default_value_t = false)]
        parse: bool,
    },

    /// Search a query on a Google source
    Google {
        /// Source name, e.g. "google_search"
        #[arg(short, long, default_value = "google_search")]
        source: String,

        /// Search query
        query: String,

        #[arg(long)]
        geo_location: Option<String>,

        /// Rendering mode: html or png
        #[arg(long)]
        render: Option<String>,

        #[arg(long, default_value = "desktop")]
        user_agent: String,

        #[arg(long, default_value_t = false)]
        parse: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scrapi=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::new(&cli.connection.base_url);
    if let Some(realtime_url) = &cli.connection.realtime_url {
        config = config.with_realtime_url(realtime_url);
    }
    let credentials = ApiCredentials::new(&cli.connection.username, &cli.connection.password);
    let client = ScrapiClient::new(&credentials, config).context("Failed to create client")?;

    let overrides = ConfigOverrides {
        timeout: cli.timeout.map(Duration::from_secs),
        poll_interval: cli.poll_interval.map(Duration::from_secs),
    };

    let payload = build_payload(&client, cli.command)?;
    tracing::info!(realtime = cli.realtime, "Submitting scrape request");

    let result = if cli.realtime {
        client.request(Method::POST, Some(&payload), &overrides).await
    } else {
        client.execute(&payload, &overrides).await
    }
    .context("Scrape failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Validate the subcommand's options and turn them into a job payload.
fn build_payload(client: &ScrapiClient, command: Commands) -> Result<Value> {
    let payload = match command {
        Commands::Search {
            source,
            query,
            domain,
            start_page,
            pages,
            limit,
            user_agent,
            locale,
            parse,
        } => {
            let mut opts = SearchOpts::default()
                .with_domain(domain)
                .with_start_page(start_page)
                .with_pages(pages)
                .with_limit(limit)
                .with_user_agent(user_agent)
                .with_parse(parse);
            if let Some(locale) = locale {
                opts = opts.with_locale(locale);
            }
            client.prepare_search(&source, &query, &opts)?
        }
        Commands::Url {
            source,
            url,
            host,
            user_agent,
            parse,
        } => {
            let opts = UrlOpts::default().with_user_agent(user_agent).with_parse(parse);
            client.prepare_url(&source, &url, &host, &opts)?
        }
        Commands::Google {
            source,
            query,
            geo_location,
            render,
            user_agent,
            parse,
        } => {
            let mut opts = GoogleOpts::default().with_user_agent(user_agent).with_parse(parse);
            if let Some(geo_location) = geo_location {
                opts = opts.with_geo_location(geo_location);
            }
            if let Some(render) = render {
                opts = opts.with_render(render);
            }
            client.prepare_google(&source, &query, &opts)?
        }
    };
    Ok(payload)
}
