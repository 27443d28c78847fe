use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinephile::config::{ClientConfig, ConfigError};
use cinephile::error::{ApiError, AuthError, ErrorCode};
use cinephile::net::api::ApiClient;
use cinephile::net::types::{FavoriRequest, SearchFilters, UniversalQuery, UpdateWatched, User};
use cinephile::pages::home::HomeView;
use cinephile::pages::movie::MovieView;
use cinephile::pages::search::SearchPage;
use cinephile::routes::{Navigation, Route, guard, resolve};
use cinephile::services::auth::AuthService;
use cinephile::services::favori::FavoriService;
use cinephile::services::film::FilmService;
use cinephile::services::user::UserService;
use cinephile::session::SessionStore;
use cinephile::state::auth::AuthContext;
use cinephile::storage::{FileStore, KeyValueStore, MemoryStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not logged in; run `cinephile login` first")]
    NotLoggedIn,
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Api(e) => e.error_code(),
            Self::Auth(e) => e.error_code(),
            Self::NotLoggedIn => "E_NOT_LOGGED_IN",
            Self::Json(_) => "E_OUTPUT",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cinephile", about = "Cinéphile movie discovery client")]
struct Cli {
    /// REST base URL including the `/api` prefix.
    #[arg(long, env = "CINEPHILE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CINEPHILE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Keep the session in memory only.
    #[arg(long, default_value_t = false)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CINEPHILE_PASSWORD")]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CINEPHILE_PASSWORD")]
        password: String,
    },
    Logout,
    Whoami,
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "CINEPHILE_NEW_PASSWORD")]
        password: String,
    },
    Films(FilmsCommand),
    Favoris(FavorisCommand),
    Preferences(PreferencesCommand),
    Recommendations,
    Home,
    /// Print where the route guard sends a path.
    Navigate {
        path: String,
    },
}

#[derive(Args, Debug)]
struct FilmsCommand {
    #[command(subcommand)]
    command: FilmsSubcommand,
}

#[derive(Subcommand, Debug)]
enum FilmsSubcommand {
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Search {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        genre: Option<i64>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        page: Option<u32>,
    },
    Show {
        id: i64,
    },
    Genres,
    Universal {
        q: String,
        #[arg(long)]
        genre: Option<i64>,
        #[arg(long)]
        year: Option<i32>,
    },
    Actor {
        name: String,
    },
    Director {
        name: String,
    },
}

#[derive(Args, Debug)]
struct FavorisCommand {
    #[command(subcommand)]
    command: FavorisSubcommand,
}

#[derive(Subcommand, Debug)]
enum FavorisSubcommand {
    List {
        #[arg(long)]
        watched: Option<bool>,
    },
    Add {
        film_id: i64,
        #[arg(long)]
        comment: Option<String>,
    },
    Watched {
        id: i64,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        watched: bool,
        #[arg(long)]
        comment: Option<String>,
    },
    Remove {
        id: i64,
    },
    Check {
        film_id: i64,
    },
}

#[derive(Args, Debug)]
struct PreferencesCommand {
    #[command(subcommand)]
    command: PreferencesSubcommand,
}

#[derive(Subcommand, Debug)]
enum PreferencesSubcommand {
    Get,
    Set { genre_ids: Vec<i64> },
}

/// Everything a command needs, wired over one session store.
struct App {
    auth: AuthContext,
    films: FilmService,
    favoris: FavoriService,
    users: UserService,
}

impl App {
    fn new(config: &ClientConfig, ephemeral: bool) -> Result<Self, CliError> {
        let store: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::new(config.session_file.clone()))
        };
        let sessions = SessionStore::new(store);
        let api = ApiClient::new(config, sessions.clone())?;
        Ok(Self {
            auth: AuthContext::new(AuthService::new(api.clone(), sessions)),
            films: FilmService::new(api.clone()),
            favoris: FavoriService::new(api.clone()),
            users: UserService::new(api),
        })
    }

    /// Apply the route guard and return the signed-in user it let through.
    fn enter(&self, route: Route) -> Result<User, CliError> {
        match guard(&self.auth.snapshot(), route) {
            Navigation::Render(_) => self.auth.current_user().ok_or(CliError::NotLoggedIn),
            Navigation::Redirect(_) => Err(CliError::NotLoggedIn),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cinephile=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error[{}]: {error}", error.error_code());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    tracing::debug!(api_url = %config.api_url, ephemeral = cli.ephemeral, "starting");

    let app = App::new(&config, cli.ephemeral)?;
    match cli.command {
        Command::Register { name, email, password } => print_json(&app.auth.register(&name, &email, &password).await?),
        Command::Login { email, password } => print_json(&app.auth.login(&email, &password).await?),
        Command::Logout => {
            app.auth.logout();
            print_json(&json!({ "status": "signed out" }))
        }
        Command::Whoami => print_json(&app.auth.current_user().ok_or(CliError::NotLoggedIn)?),
        Command::ForgotPassword { email } => {
            print_json(&json!({ "message": app.auth.service().forgot_password(&email).await? }))
        }
        Command::ResetPassword { token, password } => {
            print_json(&json!({ "message": app.auth.service().reset_password(&token, &password).await? }))
        }
        Command::Films(films) => run_films(&app, films.command).await,
        Command::Favoris(favoris) => run_favoris(&app, favoris.command).await,
        Command::Preferences(preferences) => run_preferences(&app, preferences.command).await,
        Command::Recommendations => {
            let user = app.enter(Route::Recommendations)?;
            print_json(&app.users.recommendations(user.id).await?)
        }
        Command::Home => {
            let user = app.enter(Route::Home)?;
            print_json(&HomeView::load(&app.films, &app.users, Some(&user)).await?)
        }
        Command::Navigate { path } => {
            let (action, route) = match resolve(&app.auth.snapshot(), &path) {
                Navigation::Render(route) => ("render", route),
                Navigation::Redirect(route) => ("redirect", route),
            };
            print_json(&json!({ "action": action, "path": route.path() }))
        }
    }
}

async fn run_films(app: &App, command: FilmsSubcommand) -> Result<(), CliError> {
    let route = match &command {
        FilmsSubcommand::Show { id } => Route::Movie { id: *id },
        _ => Route::Search,
    };
    let user = app.enter(route)?;
    let search = SearchPage::new(app.films.clone());
    match command {
        FilmsSubcommand::Popular { page } => print_json(&app.films.popular(page).await?),
        FilmsSubcommand::Search { query, genre, year, page } => {
            let filters = SearchFilters { query, genre, year, page };
            print_json(&search.search(&filters, Some(user.id)).await?)
        }
        FilmsSubcommand::Show { id } => print_json(&MovieView::load(&app.films, &app.favoris, id, Some(&user)).await?),
        FilmsSubcommand::Genres => print_json(&app.films.genres().await?),
        FilmsSubcommand::Universal { q, genre, year } => {
            let query = UniversalQuery { q, user_id: Some(user.id), genre, year };
            print_json(&search.universal(&query).await?)
        }
        FilmsSubcommand::Actor { name } => print_json(&app.films.search_by_actor(&name, Some(user.id)).await?),
        FilmsSubcommand::Director { name } => print_json(&app.films.search_by_director(&name, Some(user.id)).await?),
    }
}

async fn run_favoris(app: &App, command: FavorisSubcommand) -> Result<(), CliError> {
    let user = app.enter(Route::Favorites)?;
    match command {
        FavorisSubcommand::List { watched } => print_json(&app.favoris.list(user.id, watched).await?),
        FavorisSubcommand::Add { film_id, comment } => {
            let request = FavoriRequest { film_id, user_id: user.id, comment };
            print_json(&app.favoris.add(&request).await?)
        }
        FavorisSubcommand::Watched { id, watched, comment } => {
            print_json(&app.favoris.update(id, &UpdateWatched { watched: Some(watched), comment }).await?)
        }
        FavorisSubcommand::Remove { id } => {
            app.favoris.remove(id).await?;
            print_json(&json!({ "removed": id }))
        }
        FavorisSubcommand::Check { film_id } => {
            print_json(&json!({ "filmId": film_id, "favorite": app.favoris.is_favorite(user.id, film_id).await? }))
        }
    }
}

async fn run_preferences(app: &App, command: PreferencesSubcommand) -> Result<(), CliError> {
    let user = app.enter(Route::Profile)?;
    match command {
        PreferencesSubcommand::Get => print_json(&app.users.preferences(user.id).await?),
        PreferencesSubcommand::Set { genre_ids } => print_json(&app.users.update_preferences(user.id, &genre_ids).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
