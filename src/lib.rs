pub mod agent;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;

use agent::PredictionAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("adapter default"));
    info!("Temperature: {}", args.temperature);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("Persona: {}", args.persona_path.as_deref().unwrap_or("built-in"));
    info!("CORS Origins: {}", args.cors_origins.join(", "));
    info!("-------------------------");

    let agent = Arc::new(PredictionAgent::new(&args)?);

    if let Some(question) = args.ask.as_deref() {
        let answer = agent.chat(question, &[]).await?;
        println!("{}", answer.response);
        return Ok(());
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
