use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;

use crate::achievements;
use crate::bulk::{self, BulkOptions, BulkRecord};
use crate::config::{Config, DEFAULT_PORT};
use crate::gateway::{Gateway, GatewayReply, GenerationRequest};
use crate::gemini::{GeminiClient, Turn};
use crate::notify::Notification;
use crate::posts::{PostDraft, SavedPostsState};
use crate::prompts;
use crate::server;
use crate::settings::{PointAction, SettingsState, GENERATE_POINTS, TEMPLATE_POINTS, TREND_POINTS};
use crate::store::PersistedStore;

#[derive(Parser)]
#[command(name = "contentjet", version, about = "AI content studio: generation gateway, post library, creator progression")]
pub struct Args {
    /// Override the data directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP generation gateway
    Serve {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Generate a content package for one idea
    Generate {
        idea: String,
        #[arg(short, long, default_value = "x")]
        platform: String,
        #[arg(short, long, default_value = "Viral")]
        tone: String,
        #[arg(short, long, default_value = "en")]
        language: String,
        /// Comma-separated emotion targets
        #[arg(short, long, default_value = "motivation,curiosity")]
        emotions: String,
        /// Viral template framework the output must follow
        #[arg(long)]
        template: Option<String>,
        /// The idea came from the trends feed
        #[arg(long)]
        from_trend: bool,
        /// Save the result to the post library
        #[arg(short, long)]
        save: bool,
    },
    /// Generate a post for every line of a file, continuing past failures
    Bulk {
        file: PathBuf,
        #[arg(short, long, default_value = "x")]
        platform: String,
        #[arg(short, long, default_value = "Viral")]
        tone: String,
        #[arg(short, long, default_value = "en")]
        language: String,
        #[arg(short, long, default_value = "motivation,curiosity")]
        emotions: String,
    },
    /// Audit a saved post's virality
    Audit { id: i64 },
    /// Rewrite a saved post, applying audit suggestions
    Refine {
        id: i64,
        /// A suggestion to apply (repeatable)
        #[arg(short, long = "suggestion")]
        suggestions: Vec<String>,
    },
    /// Ask the coach why one of its suggestions matters
    Explain { suggestion: String },
    /// Fetch live trending topics for a platform
    Trends {
        #[arg(short, long, default_value = "x")]
        platform: String,
    },
    /// Send one message to the coaching chat
    Chat {
        message: String,
        #[arg(short, long)]
        tone: Option<String>,
    },
    /// Manage the saved post library
    Posts {
        #[command(subcommand)]
        command: PostsCommand,
    },
    /// Show or update the creator profile
    Settings {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Preferred AI style, e.g. "Viral" or "Witty"
        #[arg(long)]
        style: Option<String>,
    },
    /// Show points, streak and achievements
    Status,
    /// Clear all persisted studio state
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PostsCommand {
    List,
    Show { id: i64 },
    Delete { id: i64 },
}

struct Studio {
    config: Config,
    settings: SettingsState,
    posts: SavedPostsState,
}

impl Studio {
    fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::new(data_dir)?;
        let store = PersistedStore::new(config.data_dir.clone())?;
        Ok(Studio {
            config,
            settings: SettingsState::load(&store),
            posts: SavedPostsState::load(&store),
        })
    }

    fn gateway(&self) -> Result<Gateway<GeminiClient>> {
        let api_key = match &self.config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => bail!("GEMINI_API_KEY is not set. Export it or add it to config.json."),
        };
        Ok(Gateway::new(GeminiClient::new(api_key, self.config.model.clone())))
    }
}

fn print_notes(notes: &[Notification]) {
    for note in notes {
        println!("{} {}", note.icon(), note.message);
    }
}

fn parse_emotions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn expect_text(reply: GatewayReply) -> Result<String> {
    match reply {
        GatewayReply::Text { text } => Ok(text),
        other => bail!("Unexpected response shape: {:?}", other),
    }
}

pub async fn handle_serve(port: u16, data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    server::serve(config, port).await
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_generate(
    idea: String,
    platform: String,
    tone: String,
    language: String,
    emotions: String,
    template: Option<String>,
    from_trend: bool,
    save: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let mut studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;
    let emotion_preset = parse_emotions(&emotions);

    let request = GenerationRequest::Content {
        idea: idea.clone(),
        platform: platform.clone(),
        emotion_preset: emotion_preset.clone(),
        tone: tone.clone(),
        language: language.clone(),
        template: template.clone(),
    };
    let text = expect_text(gateway.handle(request).await?)?;

    println!("{}", text);
    println!();

    let mut notes = studio.settings.add_points(GENERATE_POINTS, PointAction::Generate);
    notes.extend(studio.settings.record_language(&language));
    if template.is_some() {
        notes.extend(studio.settings.add_points(TEMPLATE_POINTS, PointAction::Template));
    }
    if from_trend {
        notes.extend(studio.settings.add_points(TREND_POINTS, PointAction::Trend));
    }

    if save {
        let draft = PostDraft {
            platform,
            tone,
            emotion_preset,
            idea,
            text,
        };
        let (id, more) = studio.posts.create(draft, &mut studio.settings, Utc::now().date_naive());
        notes.extend(more);
        println!("{}", format!("Saved as post {}", id).dimmed());
    }

    print_notes(&notes);
    Ok(())
}

pub async fn handle_bulk(
    file: PathBuf,
    platform: String,
    tone: String,
    language: String,
    emotions: String,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;

    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let ideas: Vec<String> = raw
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if ideas.is_empty() {
        bail!("{} contains no ideas", file.display());
    }

    println!("🛠️  Generating {} posts for {}...", ideas.len(), platform);

    let options = BulkOptions { platform, tone, emotion_preset: parse_emotions(&emotions), language };
    let report = bulk::run(&gateway, &ideas, &options).await;

    for record in &report.records {
        match record {
            BulkRecord::Success { idea, post } => {
                println!("\n{} {}", "✅".green(), idea.bold());
                println!("{}", post);
            }
            BulkRecord::Error { idea, error } => {
                println!("\n{} {}", "❌".red(), idea.bold());
                println!("{}", error.red());
            }
        }
    }

    println!();
    println!(
        "Finished: {} generated, {} failed.",
        report.successes().to_string().green(),
        report.failures.to_string().red()
    );
    Ok(())
}

pub async fn handle_audit(id: i64, data_dir: Option<PathBuf>) -> Result<()> {
    let studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;
    let post = studio
        .posts
        .get(id)
        .with_context(|| format!("Post not found: {}", id))?;

    let request = GenerationRequest::Insights {
        content: post.text.clone(),
        platform: post.platform.clone(),
    };
    let reply = gateway.handle(request).await?;

    match reply {
        GatewayReply::Insights(audit) => print_audit(&audit),
        other => bail!("Unexpected response shape: {:?}", other),
    }
    Ok(())
}

fn print_audit(audit: &Value) {
    println!("{}", "Virality Audit".cyan().bold());
    let scores = [
        ("Viral Score", "viralScore"),
        ("Emotional Accuracy", "emotionalAccuracy"),
        ("Platform Optimization", "platformOptimization"),
        ("Readability", "readability"),
        ("Shareability", "shareability"),
    ];
    for (label, key) in scores {
        let score = audit[key].as_i64().unwrap_or(0);
        let rendered = format!("{:>3}/100", score);
        let colored_score = if score >= 85 {
            rendered.green()
        } else if score >= 60 {
            rendered.yellow()
        } else {
            rendered.red()
        };
        println!("  {:<22} {}", label, colored_score);
    }

    if let Some(line) = audit["quotableLine"].as_str() {
        println!("\n{} “{}”", "Quotable:".cyan(), line);
    }
    if let Some(suggestions) = audit["suggestions"].as_array() {
        println!("\n{}", "Suggestions:".cyan());
        for suggestion in suggestions.iter().filter_map(|s| s.as_str()) {
            println!("  - {}", suggestion);
        }
    }
    if let Some(guide) = audit["howToPost"].as_str() {
        println!("\n{}\n{}", "How to post:".cyan(), guide);
    }
}

pub async fn handle_refine(
    id: i64,
    suggestions: Vec<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    if suggestions.is_empty() {
        bail!("Provide at least one --suggestion to apply");
    }

    let mut studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;
    let post = studio
        .posts
        .get(id)
        .with_context(|| format!("Post not found: {}", id))?
        .clone();

    let request = GenerationRequest::Refine {
        content: post.text.clone(),
        suggestions,
        platform: post.platform.clone(),
        tone: post.tone.clone(),
    };
    let text = expect_text(gateway.handle(request).await?)?;

    println!("{}", text);
    println!();

    let draft = PostDraft {
        platform: post.platform,
        tone: post.tone,
        emotion_preset: post.emotion_preset,
        idea: post.idea,
        text,
    };
    let notes = studio.posts.update(id, draft, &mut studio.settings)?;
    print_notes(&notes);
    Ok(())
}

pub async fn handle_explain(suggestion: String, data_dir: Option<PathBuf>) -> Result<()> {
    let studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;

    let text = expect_text(
        gateway
            .handle(GenerationRequest::Explain { suggestion })
            .await?,
    )?;
    println!("{}", text);
    Ok(())
}

pub async fn handle_trends(platform: String, data_dir: Option<PathBuf>) -> Result<()> {
    let studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;

    let reply = gateway
        .handle(GenerationRequest::TrendsAnalyzer { platform: platform.clone() })
        .await?;

    match reply {
        GatewayReply::Trends { trends, sources } => {
            if trends.is_empty() {
                println!("{}", "No trends could be extracted right now.".yellow());
            } else {
                println!("{}", format!("Trending for {} creators", platform).cyan().bold());
                for trend in &trends {
                    println!("\n  {}", trend.title.bold());
                    println!("  {}", trend.summary);
                }
            }
            if !sources.is_empty() {
                println!("\n{}", format!("{} grounding sources", sources.len()).dimmed());
            }
        }
        other => bail!("Unexpected response shape: {:?}", other),
    }
    Ok(())
}

pub async fn handle_chat(
    message: String,
    tone: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let studio = Studio::open(data_dir)?;
    let gateway = studio.gateway()?;
    let username = studio.settings.settings().username.clone();

    let request = GenerationRequest::Chat {
        history: vec![Turn::user(message.clone())],
        system_instruction: prompts::DEFAULT_COACH_INSTRUCTION.to_string(),
        tone,
        username: Some(username),
    };
    let text = expect_text(gateway.handle(request).await?)?;

    println!("{}: {}", "You".cyan(), message);
    println!("{}: {}", "Guru".green(), text);
    Ok(())
}

pub fn handle_posts(command: PostsCommand, data_dir: Option<PathBuf>) -> Result<()> {
    let mut studio = Studio::open(data_dir)?;

    match command {
        PostsCommand::List => {
            let posts = studio.posts.posts();
            if posts.is_empty() {
                println!("{}", "No saved posts yet".yellow());
                return Ok(());
            }
            println!("{}", format!("Saved posts ({})", posts.len()).cyan().bold());
            for post in posts {
                let idea = if post.idea.len() > 40 {
                    format!("{}...", &post.idea[..40])
                } else {
                    post.idea.clone()
                };
                println!(
                    "  {:<15} {:<10} {:<12} {}",
                    post.id.to_string().cyan(),
                    post.platform,
                    post.date.format("%Y-%m-%d").to_string().dimmed(),
                    idea
                );
            }
        }
        PostsCommand::Show { id } => {
            let post = studio
                .posts
                .get(id)
                .with_context(|| format!("Post not found: {}", id))?;
            println!("{} {} · {} · {}", "Post".cyan().bold(), post.id, post.platform, post.tone);
            println!("{} {}", "Idea:".dimmed(), post.idea);
            println!("{} {}", "Saved:".dimmed(), post.date.format("%Y-%m-%d %H:%M"));
            if !post.version_history.is_empty() {
                println!("{} {}", "Revisions:".dimmed(), post.version_history.len());
            }
            println!("\n{}", post.text);
        }
        PostsCommand::Delete { id } => {
            if studio.posts.delete(id) {
                print_notes(&[Notification::info("Post deleted.")]);
            } else {
                println!("{}", format!("Post not found: {}", id).yellow());
            }
        }
    }
    Ok(())
}

pub fn handle_settings(
    username: Option<String>,
    email: Option<String>,
    style: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let mut studio = Studio::open(data_dir)?;

    if username.is_none() && email.is_none() && style.is_none() {
        let settings = studio.settings.settings();
        println!("{}", "Creator Profile".cyan().bold());
        println!("  Username: {}", settings.username);
        println!("  Email:    {}", settings.email);
        println!("  AI style: {}", settings.ai_style);
        return Ok(());
    }

    let mut updated = studio.settings.settings().clone();
    if let Some(username) = username {
        updated.username = username;
    }
    if let Some(email) = email {
        updated.email = email;
    }
    if let Some(style) = style {
        updated.ai_style = style;
    }
    studio.settings.save(updated);
    print_notes(&[Notification::success("Settings saved!")]);
    Ok(())
}

pub fn handle_status(data_dir: Option<PathBuf>) -> Result<()> {
    let studio = Studio::open(data_dir)?;
    let settings = studio.settings.settings();

    println!("{}", "Creator Status".cyan().bold());
    println!("  ⚡ Jet Points: {}", settings.jet_points.to_string().yellow());
    match settings.last_post_date {
        Some(date) => println!(
            "  🔥 Creation streak: {} day(s), last post {}",
            settings.creation_streak, date
        ),
        None => println!("  🔥 Creation streak: no posts yet"),
    }
    println!(
        "  📝 Saved: {}   ♻️ Refined: {}   📐 Templates: {}   📈 Trends: {}   🌐 Languages: {}",
        settings.posts_saved,
        settings.refinements_used,
        settings.templates_used,
        settings.trends_used,
        settings.languages_used.len()
    );

    println!("\n{}", "Achievements".cyan().bold());
    for entry in achievements::CATALOG {
        if settings.achievements.contains(&entry.id) {
            println!("  {} {} — {}", "✓".green(), entry.name.bold(), entry.description);
        } else {
            println!("  {} {} — {}", "·".dimmed(), entry.name.dimmed(), entry.description.dimmed());
        }
    }
    Ok(())
}

pub fn handle_reset(yes: bool, data_dir: Option<PathBuf>) -> Result<()> {
    let mut studio = Studio::open(data_dir)?;

    if !yes {
        println!("This clears your settings, progression and saved posts. Type 'yes' to confirm:");
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        if answer.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    studio.settings.reset();
    studio.posts.reset();
    print_notes(&[Notification::info("Studio state cleared.")]);
    Ok(())
}
