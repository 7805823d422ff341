use std::error::Error;

use schemarag::{
    build_prompt, generate_sql, load_snapshot, retrieve, CatalogConfig, GeminiGenerator,
    GenerationConfig, HashedEncoder, PostgresCatalog, SchemaIndex,
};

const DEFAULT_QUESTION: &str = "Which customers spent over 250?";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let question = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let question = if question.trim().is_empty() {
        DEFAULT_QUESTION.to_string()
    } else {
        question
    };

    let source = PostgresCatalog::new(CatalogConfig::default().with_env_overrides());
    let loaded = load_snapshot(&source).await?;
    let encoder = HashedEncoder::new(384)?;
    let schema = SchemaIndex::build(loaded.snapshot, &encoder).await?;

    let generation = GenerationConfig::default().with_env_overrides();
    if generation.require_api_key().is_err() {
        let hits = retrieve(&schema, &encoder, &question, 2).await?;
        for hit in &hits {
            println!("{:<24} {:.4}", hit.descriptor.qualified_name, hit.distance);
        }
        println!();
        println!("{}", build_prompt(hits.iter().map(|h| &h.descriptor), &question));
        return Ok(());
    }

    let generator = GeminiGenerator::new(&generation)?;
    let out = generate_sql(&schema, &encoder, &generator, &question, 2).await?;
    println!("{}", out.sql);
    Ok(())
}
