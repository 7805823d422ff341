use schemarag::{
    fallback_tables, retrieve, Encoder, HashedEncoder, MetadataSnapshot, SchemaIndex,
};

#[tokio::test]
async fn encoding_twice_gives_identical_vectors() {
    let encoder = HashedEncoder::new(384).unwrap();
    for table in fallback_tables() {
        let a = encoder.encode(&table.summary()).await.unwrap();
        let b = encoder.encode(&table.summary()).await.unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn batch_encoding_matches_scalar_encoding() {
    let encoder = HashedEncoder::new(128).unwrap();
    let summaries: Vec<String> = fallback_tables().iter().map(|t| t.summary()).collect();
    let refs: Vec<&str> = summaries.iter().map(String::as_str).collect();

    let batch = encoder.encode_batch(&refs).await.unwrap();
    for (text, vector) in refs.iter().zip(&batch) {
        assert_eq!(&encoder.encode(text).await.unwrap(), vector);
    }
}

#[tokio::test]
async fn rebuilt_index_ranks_identically() {
    let encoder = HashedEncoder::new(384).unwrap();
    let first = SchemaIndex::build(MetadataSnapshot::new(fallback_tables()).unwrap(), &encoder)
        .await
        .unwrap();
    let second = SchemaIndex::build(MetadataSnapshot::new(fallback_tables()).unwrap(), &encoder)
        .await
        .unwrap();

    for question in ["total payments per order", "employee hire dates", "top rated products"] {
        let a = retrieve(&first, &encoder, question, 8).await.unwrap();
        let b = retrieve(&second, &encoder, question, 8).await.unwrap();
        assert_eq!(a, b, "ranking for {question:?} changed between builds");
    }
}
