//! anigraph CLI: load a JSON dataset and query the recommendation engine

mod dataset;

use anigraph::recommend::evaluation::evaluate;
use anigraph::{
    EngineConfig, EvaluatedStrategy, HeldOut, Item, ItemId, Measure, SharedGraph, TagName,
    UserId,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anigraph", version, about = "Anime recommendation engine CLI")]
struct Cli {
    /// JSON dataset to load
    #[arg(long, global = true, env = "ANIGRAPH_DATASET")]
    dataset: Option<PathBuf>,

    /// YAML engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum StrategyArg {
    /// Pick by the user's rating count
    Auto,
    Content,
    Collaborative,
    Prediction,
    Popular,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend items for a user
    Recommend {
        user: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long, value_enum, default_value = "auto")]
        strategy: StrategyArg,

        /// Measure for collaborative filtering (defaults to the configured one)
        #[arg(long)]
        measure: Option<Measure>,
    },
    /// Compare two users
    Similarity {
        a: String,
        b: String,

        /// Measure to evaluate; all measures when omitted
        #[arg(long)]
        measure: Option<Measure>,
    },
    /// List the most similar users
    Neighbors {
        user: String,

        #[arg(long)]
        measure: Option<Measure>,
    },
    /// Most popular items, optionally within one tag
    Popular {
        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long)]
        tag: Option<String>,
    },
    /// Most recently released items
    Latest {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List every tag
    Tags,
    /// Look up an item by exact title
    Lookup { title: String },
    /// Predict a user's score for an item
    Predict { user: String, item: u64 },
    /// Show graph statistics
    Stats,
    /// Hit-count evaluation against the dataset's held-out lists
    Evaluate,
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let Some(path) = &cli.dataset else {
        bail!("no dataset given; pass --dataset or set ANIGRAPH_DATASET");
    };

    let graph = SharedGraph::new(config);
    let (dataset, _) = dataset::load(path, &graph)?;
    let format = &cli.format;

    match cli.command {
        Commands::Recommend {
            user,
            limit,
            strategy,
            measure,
        } => run_recommend(&graph, &UserId::new(user), limit, strategy, measure, format),
        Commands::Similarity { a, b, measure } => {
            run_similarity(&graph, &UserId::new(a), &UserId::new(b), measure, format)
        }
        Commands::Neighbors { user, measure } => {
            run_neighbors(&graph, &UserId::new(user), measure, format)
        }
        Commands::Popular { limit, tag } => {
            let ids = match tag {
                Some(tag) => graph.top_by_popularity_within_tag(&TagName::new(tag), limit),
                None => graph.top_by_popularity(limit),
            };
            print_items(&graph, &ids, format)
        }
        Commands::Latest { limit } => print_items(&graph, &graph.top_by_release_date(limit), format),
        Commands::Tags => {
            let tags: Vec<String> = graph
                .all_tag_names()
                .into_iter()
                .map(|t| t.as_str().to_string())
                .collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tags)?),
                OutputFormat::Table => tags.iter().for_each(|t| println!("{}", t)),
            }
            Ok(())
        }
        Commands::Lookup { title } => match graph.lookup_item_by_title(&title) {
            Some(item) => print_items(&graph, &[item.id], format),
            None => bail!("no item titled {:?}", title),
        },
        Commands::Predict { user, item } => {
            let user = UserId::new(user);
            let item = ItemId::new(item);
            let Some(score) = graph.with_recommender(|r| r.predict_score(&user, item)) else {
                bail!("unknown user {} or item {}", user, item);
            };
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "user": user, "item": item, "predicted": score })
                ),
                OutputFormat::Table => println!("{} -> {}: {:.2}", user, item, score),
            }
            Ok(())
        }
        Commands::Stats => {
            let stats = graph.statistics();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => {
                    println!("Users:          {}", stats.user_count);
                    println!("Items:          {}", stats.item_count);
                    println!("Tags:           {}", stats.tag_count);
                    println!("Reviews:        {}", stats.review_count);
                    println!("Item-tag links: {}", stats.item_tag_links);
                    println!("User-tag edges: {}", stats.user_tag_edges);
                }
            }
            Ok(())
        }
        Commands::Evaluate => run_evaluate(&graph, &dataset.held_out, format),
    }
}

fn run_recommend(
    graph: &SharedGraph,
    user: &UserId,
    limit: usize,
    strategy: StrategyArg,
    measure: Option<Measure>,
    format: &OutputFormat,
) -> Result<()> {
    let measure = measure.unwrap_or(graph.config().default_measure);
    let ids = graph.with_recommender(|r| match strategy {
        StrategyArg::Auto => r.recommend(user, limit),
        StrategyArg::Content => r.recommend_by_tags(user, limit),
        StrategyArg::Collaborative => r.recommend_by_users(user, limit, measure),
        StrategyArg::Prediction => r.recommend_by_score_prediction(user, limit),
        StrategyArg::Popular => r.recommend_popular(user, limit),
    });
    print_items(graph, &ids, format)
}

fn run_similarity(
    graph: &SharedGraph,
    a: &UserId,
    b: &UserId,
    measure: Option<Measure>,
    format: &OutputFormat,
) -> Result<()> {
    let measures: Vec<Measure> = match measure {
        Some(m) => vec![m],
        None => Measure::ALL.to_vec(),
    };
    let mut rows = Vec::with_capacity(measures.len());
    for measure in measures {
        let Some(value) = graph.similarity(a, b, measure) else {
            bail!("unknown user {} or {}", a, b);
        };
        rows.push((measure, value));
    }

    match format {
        OutputFormat::Json => {
            let doc: Vec<_> = rows
                .iter()
                .map(|(m, v)| json!({ "measure": m, "value": v }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Measure", "Kind", "Value"]);
            for (measure, value) in rows {
                let kind = if measure.is_distance() { "distance" } else { "similarity" };
                table.add_row(vec![measure.to_string(), kind.to_string(), format!("{:.4}", value)]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_neighbors(
    graph: &SharedGraph,
    user: &UserId,
    measure: Option<Measure>,
    format: &OutputFormat,
) -> Result<()> {
    let measure = measure.unwrap_or(graph.config().default_measure);
    let neighbors = graph.with_recommender(|r| r.most_similar_users(user, measure));

    match format {
        OutputFormat::Json => {
            let doc: Vec<_> = neighbors
                .iter()
                .map(|(id, score)| json!({ "user": id, "score": score }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Table => {
            let mut table = new_table(&["User", measure.as_str()]);
            for (id, score) in &neighbors {
                table.add_row(vec![id.to_string(), format!("{:.4}", score)]);
            }
            println!("{}", table);
            println!("{} neighbor(s)", neighbors.len());
        }
    }
    Ok(())
}

fn run_evaluate(
    graph: &SharedGraph,
    held_out: &[HeldOut],
    format: &OutputFormat,
) -> Result<()> {
    if held_out.is_empty() {
        bail!("dataset has no held_out lists to evaluate against");
    }
    let suite = EvaluatedStrategy::standard_suite();
    let report = graph.with_recommender(|r| evaluate(r, held_out, &suite));

    match format {
        OutputFormat::Json => {
            let doc: Vec<_> = report
                .scores
                .iter()
                .map(|s| {
                    json!({
                        "strategy": s.strategy.to_string(),
                        "hits": s.hits,
                        "liked": s.liked,
                        "requested": s.requested,
                        "elapsed_ms": s.elapsed.as_secs_f64() * 1000.0,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Strategy", "Hits", "Recall", "Time (ms)"]);
            for s in &report.scores {
                table.add_row(vec![
                    s.strategy.to_string(),
                    s.hits.to_string(),
                    format!("{:.3}", s.recall()),
                    format!("{:.1}", s.elapsed.as_secs_f64() * 1000.0),
                ]);
            }
            println!("{}", table);
            println!("{} user(s) evaluated", report.users);
        }
    }
    Ok(())
}

fn print_items(graph: &SharedGraph, ids: &[ItemId], format: &OutputFormat) -> Result<()> {
    let items: Vec<Item> = ids.iter().filter_map(|&id| graph.item(id)).collect();

    match format {
        OutputFormat::Json => {
            let doc: Vec<_> = items
                .iter()
                .map(|item| {
                    json!({
                        "id": item.id,
                        "title": item.attrs.title,
                        "popularity_rank": item.attrs.popularity_rank,
                        "release_date": item.attrs.release_date,
                        "tags": item.sorted_tags(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Table => {
            if items.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            let mut table = new_table(&["Id", "Title", "Popularity", "Released", "Tags"]);
            for item in &items {
                let tags: Vec<&str> = item.sorted_tags().iter().map(|t| t.as_str()).collect();
                table.add_row(vec![
                    item.id.as_u64().to_string(),
                    item.attrs.title.clone(),
                    optional(item.attrs.popularity_rank),
                    optional(item.attrs.release_date),
                    tags.join(", "),
                ]);
            }
            println!("{}", table);
            println!("{} row(s)", items.len());
        }
    }
    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
