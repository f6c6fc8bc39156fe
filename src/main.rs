//! Showtrack CLI entry point.
//!
//! Manages the local movie library: saving shows into lists, ratings,
//! status changes and live views of the database.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;

use showtrack::application::ListSelection;
use showtrack::domain::format::{
    RatingBand, format_rating, format_release_date, format_runtime, poster_url,
};
use showtrack::domain::{Show, ShowId, ShowStatus, StoreError};
use showtrack::infra::app_config::{self, StartTab, Theme};
use showtrack::infra::db::Database;
use showtrack::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "showtrack")]
#[command(version)]
#[command(about = "Track the movies you plan to watch, are watching and have seen", long_about = None)]
struct Args {
    /// Database file (defaults to SHOWTRACK_DB_PATH or the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a show into a list (Planning by default)
    Add {
        id: ShowId,
        title: String,
        #[arg(short, long, default_value = "Planning")]
        list: String,
        #[arg(long)]
        overview: Option<String>,
        #[arg(long)]
        poster: Option<String>,
        /// Release date as YYYY-MM-DD
        #[arg(long)]
        release: Option<String>,
        /// Runtime in minutes
        #[arg(long)]
        runtime: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        genres: Vec<String>,
    },

    /// Replace the details of a stored show
    Update {
        id: ShowId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        overview: Option<String>,
        #[arg(long)]
        poster: Option<String>,
        #[arg(long)]
        release: Option<String>,
        #[arg(long)]
        runtime: Option<u32>,
    },

    /// Rate a show from 0 to 10
    Rate { id: ShowId, rating: String },

    /// Set the watch status (planning, watching, completed)
    Status { id: ShowId, status: ShowStatus },

    /// Delete a show and remove it from every list
    Delete { id: ShowId },

    /// Show the details of one show
    Show { id: ShowId },

    /// List the shows in a list ("All" for every show)
    List {
        #[arg(default_value = "All")]
        name: ListSelection,
    },

    /// List every user list
    Lists,

    /// Create a custom list
    CreateList { name: String },

    /// Delete a custom list
    DeleteList { name: String },

    /// Move a show from one list to another
    Move { id: ShowId, from: String, to: String },

    /// Copy a show into a custom list
    Copy { id: ShowId, list: String },

    /// Remove a show from a list without deleting it
    Remove { id: ShowId, list: String },

    /// Print live updates until interrupted
    Watch {
        #[command(subcommand)]
        target: WatchTarget,
    },

    /// Show or change settings
    Settings {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        start_tab: Option<StartTab>,
        #[arg(long)]
        dynamic_color: Option<bool>,
        /// Default list for the list view ("All" to clear)
        #[arg(long)]
        default_list: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum WatchTarget {
    /// Every stored show, or one list
    List {
        #[arg(default_value = "All")]
        name: ListSelection,
    },
    /// A single show
    Show { id: ShowId },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let db = match args.db {
        Some(path) => Database::open_at(path),
        None => Database::open(),
    }
    .context("failed to open the show database")?;
    let state = AppState::new(db, app_config::load_config());

    run(&state, args.command).await
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    let library = &state.library;

    match command {
        Commands::Add {
            id,
            title,
            list,
            overview,
            poster,
            release,
            runtime,
            genres,
        } => {
            let show = Show {
                show_id: id,
                title,
                overview,
                poster_path: poster,
                release_date: release,
                runtime,
                user_rating: 0.0,
                genres,
            };
            if library.add_show_to_list(&list, &show).await? {
                println!("Added {} to {}", show.title, list);
            } else {
                println!("{} is already in {}", show.title, list);
            }
        }
        Commands::Update {
            id,
            title,
            overview,
            poster,
            release,
            runtime,
        } => {
            let Some(mut show) = library.find_show(id).await? else {
                bail!("no show with id {id}");
            };
            if let Some(title) = title {
                show.title = title;
            }
            show.overview = overview.or(show.overview);
            show.poster_path = poster.or(show.poster_path);
            show.release_date = release.or(show.release_date);
            show.runtime = runtime.or(show.runtime);
            library.shows().update(&show).await?;
            println!("Updated {}", show.title);
        }
        Commands::Rate { id, rating } => {
            let stored = library.change_rating_input(id, &rating).await?;
            println!("Rated {} {}", id, format_rating(stored));
        }
        Commands::Status { id, status } => {
            if library.set_status(id, status).await? {
                println!("Show {id} is now {status}");
            } else {
                println!("Show {id} is already {status}");
            }
        }
        Commands::Delete { id } => {
            if library.delete_show(id).await? {
                println!("Deleted show {id}");
            } else {
                println!("No show with id {id}");
            }
        }
        Commands::Show { id } => {
            let Some(show) = library.find_show(id).await? else {
                bail!("no show with id {id}");
            };
            let lists = library.lists_for_show(id).await?;
            print_details(&show, &lists);
        }
        Commands::List { name } => {
            let shows = library.watch_selection(&name).first().await?;
            print_shows(&shows);
        }
        Commands::Lists => {
            for list in library.all_lists().await? {
                let marker = if list.is_default { "*" } else { " " };
                println!("{marker} {}", list.list_name);
            }
        }
        Commands::CreateList { name } => {
            let list = library.lists().create_list(&name).await?;
            println!("Created list {}", list.list_name);
        }
        Commands::DeleteList { name } => {
            if library.lists().delete_list(&name).await? {
                println!("Deleted list {name}");
            } else {
                println!("No list named {name}");
            }
        }
        Commands::Move { id, from, to } => {
            library.move_show_to_list(&from, &to, id).await?;
            println!("Moved show {id} from {from} to {to}");
        }
        Commands::Copy { id, list } => {
            if library.copy_show_to_list(&list, id).await? {
                println!("Copied show {id} to {list}");
            } else {
                println!("Show {id} is already in {list}");
            }
        }
        Commands::Remove { id, list } => {
            if library.remove_show_from_list(&list, id).await? {
                println!("Removed show {id} from {list}");
            } else {
                println!("Show {id} is not in {list}");
            }
        }
        Commands::Watch { target } => watch(state, target).await?,
        Commands::Settings {
            theme,
            start_tab,
            dynamic_color,
            default_list,
        } => {
            let config = if theme.is_none()
                && start_tab.is_none()
                && dynamic_color.is_none()
                && default_list.is_none()
            {
                state.config.read().clone()
            } else {
                state.update_config(|config| {
                    if let Some(theme) = theme {
                        config.theme = theme;
                    }
                    if let Some(tab) = start_tab {
                        config.start_tab = tab;
                    }
                    if let Some(dynamic) = dynamic_color {
                        config.dynamic_color = dynamic;
                    }
                    if let Some(list) = default_list {
                        config.default_list = match list.parse::<ListSelection>() {
                            Ok(ListSelection::Named(name)) => Some(name),
                            _ => None,
                        };
                    }
                })?
            };
            println!("Theme:           {}", config.theme);
            println!("Dynamic colour:  {}", config.dynamic_color);
            println!("Start tab:       {}", config.start_tab);
            println!(
                "Default list:    {}",
                config.default_list.as_deref().unwrap_or("All")
            );
        }
    }

    Ok(())
}

async fn watch(state: &AppState, target: WatchTarget) -> Result<()> {
    match target {
        WatchTarget::List { name } => {
            let mut stream = state.library.watch_selection(&name);
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    next = stream.next() => match next {
                        Some(snapshot) => print!("{}", render_snapshot(snapshot)?),
                        None => break,
                    },
                }
            }
        }
        WatchTarget::Show { id } => {
            let mut stream = state.library.shows().get_show(id);
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    next = stream.next() => match next {
                        Some(snapshot) => match snapshot? {
                            Some(show) => {
                                println!("---");
                                let lists = state.library.lists_for_show(id).await?;
                                print_details(&show, &lists);
                            }
                            None => println!("--- show {id} is not in the library"),
                        },
                        None => break,
                    },
                }
            }
        }
    }
    Ok(())
}

fn print_shows(shows: &[Show]) {
    print!("{}", render_shows(shows));
}

fn render_shows(shows: &[Show]) -> String {
    if shows.is_empty() {
        return "(no shows)\n".to_string();
    }
    shows
        .iter()
        .map(|show| {
            format!(
                "{:>8}  {:<40}  {:>4}  {}\n",
                show.show_id,
                show.title,
                format_rating(show.user_rating),
                format_release_date(show.release_date.as_deref()),
            )
        })
        .collect()
}

/// One live update of a list. A failed snapshot renders nothing.
fn render_snapshot(snapshot: Result<Vec<Show>, StoreError>) -> Result<String> {
    let shows = snapshot?;
    Ok(format!("--- {} show(s)\n{}", shows.len(), render_shows(&shows)))
}

fn print_details(show: &Show, lists: &[String]) {
    let status = ShowStatus::from_memberships(lists)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Not in a status list".to_string());

    println!("{} ({})", show.title, show.show_id);
    println!("  Status:   {status}");
    println!(
        "  Rating:   {} ({:?})",
        format_rating(show.user_rating),
        RatingBand::for_rating(show.user_rating)
    );
    println!("  Released: {}", format_release_date(show.release_date.as_deref()));
    println!("  Runtime:  {}", format_runtime(show.runtime));
    if !show.genres.is_empty() {
        println!("  Genres:   {}", show.genres.join(", "));
    }
    if let Some(path) = &show.poster_path {
        println!("  Poster:   {}", poster_url(path));
    }
    if !lists.is_empty() {
        println!("  Lists:    {}", lists.join(", "));
    }
    if let Some(overview) = &show.overview {
        println!();
        println!("  {overview}");
    }
}
