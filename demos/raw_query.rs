//! Generic query example for the Vote Smart library.
//!
//! Calls any API method and prints the redacted request URL and the raw response body.
//!
//! Usage:
//! ```
//! VOTESMART_API_KEY=your_token cargo run --example raw_query -- JSON Officials.getByZip zip5=05401
//! ```

use std::env;
use votesmart::{validate_output_type, ClientConfig, VoteSmartClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <XML|JSON> <method> [name=value]...", args[0]);
        std::process::exit(1);
    }

    let output_type = validate_output_type(&args[1])?;
    let params: Vec<(&str, &str)> = args[3..]
        .iter()
        .filter_map(|arg| arg.split_once('='))
        .collect();

    let client = VoteSmartClient::new(ClientConfig::from_env(output_type)?)?;
    let result = client.query(&args[2], params).await?;

    println!("Request: {}", result.redacted_url());
    println!("Fetched: {}", result.fetched_at());
    if let Some(message) = result.error_message() {
        println!("Service error: {}", message);
    }
    println!("{}", result.raw_body());

    Ok(())
}
