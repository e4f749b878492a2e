use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_recommender::{
    client::HttpApiClient,
    config::Config,
    services::evaluate,
    ui::{HtmlPage, MemoryChartBackend, UiController},
};

#[derive(Parser, Debug)]
#[command(name = "movie-recommender")]
#[command(about = "Content-based movie recommendation service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,

    /// Score the recommender offline against the catalog
    Evaluate {
        #[arg(short, long, default_value_t = 10)]
        k: usize,

        /// Number of movies used as queries; 0 uses the whole catalog
        #[arg(short, long, default_value_t = 200)]
        sample: usize,
    },

    /// Drive the page against a running server and print the rendered regions
    Render {
        #[arg(long, default_value = "http://localhost:5000")]
        server: String,

        #[arg(short, long)]
        query: Option<String>,

        #[arg(long, default_value = "10")]
        top_k: String,

        /// Record a view of the result at this position
        #[arg(long)]
        open: Option<usize>,

        /// Clear history before rendering
        #[arg(long)]
        clear: bool,

        /// Answer yes to the clear confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command.unwrap_or(Command::Serve)).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve => movie_recommender::serve(Config::from_env()?).await,
        Command::Evaluate { k, sample } => {
            let config = Config::from_env()?;
            let report = tokio::task::spawn_blocking(move || {
                let recommender = movie_recommender::load_recommender(&config)?;
                let sample = (sample > 0).then_some(sample);
                anyhow::Ok(evaluate(&recommender, k, sample))
            })
            .await??;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Render {
            server,
            query,
            top_k,
            open,
            clear,
            yes,
        } => {
            let mut page = HtmlPage::with_input(query.clone().unwrap_or_default(), top_k);
            page.confirm_answer = yes;

            let charts = MemoryChartBackend::default();
            let mut ui = UiController::new(HttpApiClient::new(server), page, charts.clone());

            if clear {
                ui.clear_history().await;
            }
            ui.init().await;
            if query.is_some() {
                ui.recommend().await;
            }
            if let Some(index) = open {
                if !ui.open_result(index).await {
                    anyhow::bail!("No result at position {}", index);
                }
            }

            let charts: Vec<_> = charts
                .live_charts()
                .into_iter()
                .map(|(slot, config)| json!({ "slot": slot, "config": config }))
                .collect();
            let output = json!({ "page": ui.page(), "charts": charts });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}
