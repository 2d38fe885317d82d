//! Candidate biography lookup example for the Vote Smart library.
//!
//! This example demonstrates how to:
//! - Resolve the API token from the environment (or a `.env` file)
//! - Fetch a typed candidate biography
//! - Handle service-level and transport errors
//!
//! Usage:
//! ```
//! VOTESMART_API_KEY=your_token cargo run --example candidate_bio -- 9026
//! ```

use std::env;
use votesmart::{ClientConfig, OutputType, VoteSmartClient, VoteSmartError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Pick up VOTESMART_API_KEY from a local .env file if present
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <candidate-id>", args[0]);
        eprintln!("Example: {} 9026", args[0]);
        std::process::exit(1);
    }
    let candidate_id = &args[1];

    let config = match ClientConfig::from_env(OutputType::Xml) {
        Ok(config) => config,
        Err(VoteSmartError::MissingCredential { key }) => {
            eprintln!("Set {} to your Vote Smart API token.", key);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    let client = VoteSmartClient::new(config)?;

    println!("Looking up candidate: {}", candidate_id);
    match client.candidate_bio(candidate_id).await {
        Ok(bio) => {
            if let Some(info) = &bio.general_info {
                if let (Some(title), Some(link)) = (&info.title, &info.link_back) {
                    println!("{} <{}>", title, link);
                }
            }

            let candidate = &bio.candidate;
            println!("\n=== Candidate ===");
            if let Some(name) = candidate.full_name() {
                println!("Name: {}", name);
            }
            if let Some(birth_date) = &candidate.birth_date {
                match &candidate.birth_place {
                    Some(place) => println!("Birth: {} ({})", birth_date, place),
                    None => println!("Birth: {}", birth_date),
                }
            }
            if let Some(gender) = &candidate.gender {
                println!("Gender: {}", gender);
            }
            if let Some(photo) = candidate.photo_url() {
                println!("Photo: {}", photo);
            }

            if let Some(office) = &bio.office {
                println!("\n=== Office ===");
                if let Some(parties) = &office.parties {
                    println!("Party: {}", parties);
                }
                if let Some(name) = &office.name {
                    println!("Office: {}", name);
                }
            }
        }
        Err(VoteSmartError::ApiError { message }) => {
            eprintln!("Vote Smart error: {}", message);
            std::process::exit(1);
        }
        Err(e) if e.is_transport_failure() => {
            eprintln!("Could not reach Vote Smart: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Lookup error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
