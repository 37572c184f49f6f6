use std::path::PathBuf;

use clap::Parser;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing_subscriber::EnvFilter;

use mirror_proxy::loadtest::{LoadTester, DEFAULT_MAX_CONCURRENCY};

#[derive(Parser)]
#[command(name = "load-tester")]
#[command(about = "GET a list of URLs concurrently and report response times", long_about = None)]
struct Cli {
    /// URLs to request
    urls: Vec<String>,

    /// File with one URL per line
    #[arg(short = 'f', long)]
    urls_file: Option<PathBuf>,

    /// Extra request header, as `Name: value`; repeatable
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut urls = cli.urls;
    if let Some(path) = &cli.urls_file {
        let contents = std::fs::read_to_string(path)?;
        urls.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }
    if urls.is_empty() {
        return Err("no URLs given".into());
    }

    let mut headers = HeaderMap::new();
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("malformed header {header:?}, expected `Name: value`"))?;
        headers.append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    let report = LoadTester::new(cli.max_concurrency).run(urls, headers).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
