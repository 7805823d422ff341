use async_trait::async_trait;
use schemarag::{
    generate_sql, load_snapshot, retrieve, CatalogError, GenerationError, HashedEncoder,
    MetadataSnapshot, MetadataSource, PipelineError, RetrievalError, SchemaIndex, SnapshotOrigin,
    SqlGenerator, TableDescriptor,
};

struct Unconfigured;

#[async_trait]
impl MetadataSource for Unconfigured {
    async fn fetch(&self) -> Result<Vec<TableDescriptor>, CatalogError> {
        Err(CatalogError::NotConfigured)
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

struct Unreachable;

#[async_trait]
impl MetadataSource for Unreachable {
    async fn fetch(&self) -> Result<Vec<TableDescriptor>, CatalogError> {
        Err(CatalogError::Connection("password authentication failed".into()))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

struct Down;

#[async_trait]
impl SqlGenerator for Down {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Transport("connection reset".into()))
    }

    fn name(&self) -> &str {
        "down"
    }
}

#[tokio::test]
async fn not_configured_routes_to_fallback() {
    let loaded = load_snapshot(&Unconfigured).await.unwrap();
    assert_eq!(loaded.origin, SnapshotOrigin::Fallback);
    assert_eq!(loaded.snapshot.len(), 8);
}

#[tokio::test]
async fn connection_failure_propagates() {
    let err = load_snapshot(&Unreachable).await.unwrap_err();
    assert!(matches!(err, CatalogError::Connection(_)));
}

#[tokio::test]
async fn empty_metadata_is_unavailable_not_empty_success() {
    let encoder = HashedEncoder::new(32).unwrap();
    let schema = SchemaIndex::build(MetadataSnapshot::empty(), &encoder)
        .await
        .unwrap();

    for k in [-3, 0, 1, 2, 100] {
        let err = retrieve(&schema, &encoder, "customers", k).await.unwrap_err();
        assert_eq!(err, RetrievalError::Unavailable);
    }
}

#[tokio::test]
async fn backend_failure_surfaces_as_generation_error() {
    let encoder = HashedEncoder::new(32).unwrap();
    let schema = SchemaIndex::build(
        MetadataSnapshot::new(schemarag::fallback_tables()).unwrap(),
        &encoder,
    )
    .await
    .unwrap();

    let err = generate_sql(&schema, &encoder, &Down, "list orders", 2)
        .await
        .unwrap_err();
    match err {
        PipelineError::Generation(inner) => assert!(inner.is_transient()),
        other => panic!("expected a generation error, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_question_is_rejected_before_generation() {
    let encoder = HashedEncoder::new(32).unwrap();
    let schema = SchemaIndex::build(
        MetadataSnapshot::new(schemarag::fallback_tables()).unwrap(),
        &encoder,
    )
    .await
    .unwrap();

    let err = generate_sql(&schema, &encoder, &Down, " \n\t", 2)
        .await
        .unwrap_err();
    assert_eq!(err, PipelineError::Retrieval(RetrievalError::EmptyQuery));
}
