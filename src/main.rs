mod achievements;
mod bulk;
mod cli;
mod config;
mod error;
mod gateway;
mod gemini;
mod notify;
mod posts;
mod prompts;
mod schema;
mod server;
mod settings;
mod store;

use clap::Parser;

use cli::{Args, Command};

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    let data_dir = args.data_dir;

    let result = match args.command {
        Command::Serve { port } => cli::handle_serve(port, data_dir).await,
        Command::Generate {
            idea,
            platform,
            tone,
            language,
            emotions,
            template,
            from_trend,
            save,
        } => {
            cli::handle_generate(
                idea, platform, tone, language, emotions, template, from_trend, save, data_dir,
            )
            .await
        }
        Command::Bulk { file, platform, tone, language, emotions } => {
            cli::handle_bulk(file, platform, tone, language, emotions, data_dir).await
        }
        Command::Audit { id } => cli::handle_audit(id, data_dir).await,
        Command::Refine { id, suggestions } => cli::handle_refine(id, suggestions, data_dir).await,
        Command::Explain { suggestion } => cli::handle_explain(suggestion, data_dir).await,
        Command::Trends { platform } => cli::handle_trends(platform, data_dir).await,
        Command::Chat { message, tone } => cli::handle_chat(message, tone, data_dir).await,
        Command::Posts { command } => cli::handle_posts(command, data_dir),
        Command::Settings { username, email, style } => {
            cli::handle_settings(username, email, style, data_dir)
        }
        Command::Status => cli::handle_status(data_dir),
        Command::Reset { yes } => cli::handle_reset(yes, data_dir),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
