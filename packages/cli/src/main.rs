#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI orchestrator for the rent scout toolchain.
//!
//! Unified entry point that lets users pick a tool: run the full scoring
//! pipeline, start the API server, or refresh the amenity source from
//! OpenStreetMap.

mod pipeline;

use dialoguer::Select;
use rent_scout_models::AnalyzerConfig;

/// Top-level tool selection.
enum Tool {
    RunPipeline,
    Server,
    RefreshAmenities,
}

impl Tool {
    const ALL: &[Self] = &[Self::RunPipeline, Self::Server, Self::RefreshAmenities];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunPipeline => "Score and rank neighborhoods",
            Self::Server => "Start API server",
            Self::RefreshAmenities => "Refresh amenity counts from OpenStreetMap",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = AnalyzerConfig::from_env();

    println!("Rent Scout Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::RunPipeline => pipeline::run(&config).await?,
        Tool::Server => {
            let bind_addr =
                std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port: u16 = std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080);

            // The server uses actix-web's runtime, so run it in a
            // blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(rent_scout_server::run(config, bind_addr, port))
                    .map_err(|e| e.to_string())
            })
            .await??;
        }
        Tool::RefreshAmenities => pipeline::refresh_amenities(&config).await?,
    }

    Ok(())
}
