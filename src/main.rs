// main.rs
// Distributed under terms of the MIT license.

mod account;
mod app;
mod entities;
mod error;
mod fanfou;
mod paint;
mod render;
mod store;
mod utils;

use app::{ColorUpdate, ConfigUpdate, Nofan};
use clap::{Args, Parser, Subcommand};
use error::NofanError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use store::Store;

#[derive(Parser)]
#[command(name = "nofan", version, about = "A command-line client for Fanfou")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Attach a photo from path
    #[arg(short, long, global = true)]
    photo: Option<PathBuf>,
    /// Attach a photo from clipboard
    #[arg(short, long, global = true)]
    clipboard: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Config nofan
    Config(ConfigArgs),
    /// Customize color style
    Colors(ColorArgs),
    /// Login nofan
    Login {
        username: Option<String>,
        password: Option<String>,
    },
    /// Logout nofan
    Logout,
    /// Switch account
    #[command(alias = "s")]
    Switch { id: Option<String> },
    /// Show home timeline
    #[command(alias = "h")]
    Home,
    /// Show mentions
    #[command(alias = "m")]
    Mentions,
    /// Show my statuses
    Me,
    /// Show public timeline
    #[command(alias = "p")]
    Public,
    /// Show context timeline
    #[command(alias = "cont")]
    Context { id: String },
    /// Search public or user timeline
    #[command(alias = "se")]
    Search {
        /// Search inside one user's timeline
        #[arg(long)]
        user: Option<String>,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Fetch trends
    #[command(alias = "tr")]
    Trends,
    /// Fetch user timeline
    User { id: String },
    /// Fetch status item
    Show { id: String },
    /// Reply status
    #[command(alias = "re")]
    Reply { id: String, text: Vec<String> },
    /// Repost status
    #[command(alias = "rt")]
    Repost { id: String, text: Vec<String> },
    /// Delete last status
    Undo,
    /// Create GET request
    Get { uri: String },
    /// Create POST request
    Post { uri: String },
    // bare words post a status
    #[command(external_subcommand)]
    Text(Vec<String>),
}

#[derive(Args)]
struct ConfigArgs {
    /// Consumer key
    #[arg(long)]
    key: Option<String>,
    /// Consumer secret
    #[arg(long)]
    secret: Option<String>,
    /// Statuses per fetch
    #[arg(long)]
    count: Option<u32>,
    /// Show time tags
    #[arg(long)]
    time_tag: Option<bool>,
    /// Show photo tags
    #[arg(long)]
    photo_tag: Option<bool>,
    /// Use https
    #[arg(long)]
    ssl: Option<bool>,
    /// Verbose timelines by default
    #[arg(long)]
    verbose_mode: Option<bool>,
    /// API domain
    #[arg(long)]
    api_domain: Option<String>,
    /// OAuth domain
    #[arg(long)]
    oauth_domain: Option<String>,
}

#[derive(Args)]
struct ColorArgs {
    /// Author name style
    #[arg(long)]
    name: Option<String>,
    /// Plain text style
    #[arg(long)]
    text: Option<String>,
    /// Mention style
    #[arg(long)]
    at: Option<String>,
    /// Link style
    #[arg(long)]
    link: Option<String>,
    /// Hashtag style
    #[arg(long)]
    tag: Option<String>,
    /// Photo tag style
    #[arg(long)]
    photo: Option<String>,
    /// Time tag style
    #[arg(long)]
    timeago: Option<String>,
    /// Search highlight style
    #[arg(long)]
    highlight: Option<String>,
}

impl From<ConfigArgs> for ConfigUpdate {
    fn from(args: ConfigArgs) -> Self {
        ConfigUpdate {
            consumer_key: args.key,
            consumer_secret: args.secret,
            display_count: args.count,
            time_tag: args.time_tag,
            photo_tag: args.photo_tag,
            ssl: args.ssl,
            verbose: args.verbose_mode,
            api_domain: args.api_domain,
            oauth_domain: args.oauth_domain,
        }
    }
}

impl From<ColorArgs> for ColorUpdate {
    fn from(args: ColorArgs) -> Self {
        ColorUpdate {
            name: args.name,
            text: args.text,
            at: args.at,
            link: args.link,
            tag: args.tag,
            photo: args.photo,
            timeago: args.timeago,
            highlight: args.highlight,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        utils::fail(&e.to_string());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), NofanError> {
    let store = Store::open_default()?;
    let mut nofan = Nofan::new(store, cli.verbose, cli.photo.clone(), cli.clipboard)?;

    match cli.command {
        None => nofan.home_timeline().await,
        Some(Command::Config(args)) => nofan.configure(args.into()),
        Some(Command::Colors(args)) => nofan.colors(args.into()),
        Some(Command::Login { username, password }) => {
            let username = match username {
                Some(username) => username,
                None => prompt("Enter your username: ")?,
            };
            let password = match password {
                Some(password) => password,
                None => prompt("Enter your password: ")?,
            };
            nofan.login(&username, &password).await
        }
        Some(Command::Logout) => nofan.logout(),
        Some(Command::Switch { id }) => nofan.switch_user(id.as_deref()),
        Some(Command::Home) => nofan.home_timeline().await,
        Some(Command::Mentions) => nofan.mentions().await,
        Some(Command::Me) => nofan.me().await,
        Some(Command::Public) => nofan.public_timeline().await,
        Some(Command::Context { id }) => nofan.context_timeline(&id).await,
        Some(Command::Search { user, query }) => {
            nofan
                .search_timeline(&query.join(" "), user.as_deref())
                .await
        }
        Some(Command::Trends) => nofan.trends().await,
        Some(Command::User { id }) => nofan.user_timeline(&id).await,
        Some(Command::Show { id }) => nofan.show(&id).await,
        Some(Command::Reply { id, text }) => nofan.reply(&id, &text.join(" ")).await,
        Some(Command::Repost { id, text }) => nofan.repost(&id, &text.join(" ")).await,
        Some(Command::Undo) => nofan.undo().await,
        Some(Command::Get { uri }) => nofan.raw_get(&uri).await,
        Some(Command::Post { uri }) => nofan.raw_post(&uri).await,
        Some(Command::Text(words)) => {
            let text = words.join(" ");
            if cli.photo.is_some() || cli.clipboard {
                nofan.upload(&text).await
            } else {
                nofan.update(&text).await
            }
        }
    }
}

fn prompt(label: &str) -> Result<String, NofanError> {
    print!("{}", label);
    io::stdout()
        .flush()
        .map_err(|e| NofanError::IoError(e.to_string()))?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| NofanError::IoError(e.to_string()))?;
    Ok(input.trim().to_string())
}
