use clap::{Parser, Subcommand};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use curiosity_client::config::CONFIG;
use curiosity_client::highlight::{RenderedEpisode, render_episode, strip_control};
use curiosity_client::{PartialSearchInput, QueryKind, Run, SearchClient, Season, build};

#[derive(Parser, Debug)]
#[command(name = "curiosity", about = "Search the episode transcript archive")]
struct Cli {
    /// Search endpoint, overrides CURIOSITY_ENDPOINT
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and print the matching passages
    Search {
        query: Option<String>,
        /// keywords, phrase or web
        #[arg(long, short)]
        kind: Option<QueryKind>,
        /// Restrict to a season; repeat for several
        #[arg(long = "season", short)]
        seasons: Vec<String>,
        #[arg(long)]
        no_highlight: bool,
        #[arg(long)]
        page_size: Option<usize>,
        /// How many pages to load before stopping
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Print HTML fragments instead of terminal text
        #[arg(long)]
        html: bool,
    },
    /// List the known season identifiers
    Seasons,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Bridge log crate -> tracing (reqwest logs through `log`)
    tracing_log::LogTracer::init()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Seasons => {
            for season in Season::ALL {
                println!("{season}");
            }
            Ok(())
        }
        Command::Search {
            query,
            kind,
            seasons,
            no_highlight,
            page_size,
            pages,
            html,
        } => {
            let mut config = CONFIG.clone();
            if let Some(endpoint) = cli.endpoint {
                config.endpoint = endpoint;
            }

            let input = PartialSearchInput {
                query,
                kind,
                seasons: (!seasons.is_empty()).then_some(seasons),
                highlight: no_highlight.then_some(false),
                page: None,
                page_size: page_size.or(config.page_size),
            };
            let request = build(input)?;
            let client = SearchClient::from_config(&config)?;

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            let mut stream = Box::pin(client.pages(request, cancel).take(pages.max(1)));
            let mut total = 0usize;
            let mut more = false;
            while let Some(page) = stream.next().await {
                let page = page?;
                total += page.episodes.len();
                more = page.has_more();
                for episode in &page.episodes {
                    let rendered = render_episode(episode);
                    if html {
                        println!("{}", rendered.to_html());
                    } else {
                        print_episode(&rendered);
                    }
                }
            }

            println!("Total Results: {total}{}", if more { " (more available)" } else { "" });
            Ok(())
        }
    }
}

fn print_episode(episode: &RenderedEpisode) {
    println!(
        "\x1b[1m{}\x1b[0m [{}]",
        strip_control(&episode.title),
        strip_control(&episode.season)
    );
    if let Some(url) = &episode.docs_url {
        println!("  {}", strip_control(url));
    }
    for passage in &episode.passages {
        println!("  > {}", terminal_line(passage.runs()));
    }
    println!();
}

fn terminal_line(runs: &[Run]) -> String {
    let mut line = String::new();
    for run in runs {
        let text = strip_control(&run.text);
        if run.emphasized {
            line.push_str(&format!("\x1b[1;33m{text}\x1b[0m"));
        } else {
            line.push_str(&text);
        }
    }
    line
}

#[test]
fn test_terminal_line_neutralizes_backend_escapes() {
    let runs = vec![
        Run {
            text: "the \x1b[2J".to_string(),
            emphasized: false,
        },
        Run {
            text: "beacon\x1b]0;pwned\x07".to_string(),
            emphasized: true,
        },
    ];
    let line = terminal_line(&runs);
    assert_eq!(line, "the [2J\x1b[1;33mbeacon]0;pwned\x1b[0m");
    assert_eq!(line.matches('\x1b').count(), 2);
}
