use proptest::prelude::*;

use schemarag::{
    build_prompt, clamp_top_k, retrieve, strip_code_fence, HashedEncoder, MetadataSnapshot,
    SchemaIndex, TableDescriptor,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn tables(count: usize) -> Vec<TableDescriptor> {
    (0..count)
        .map(|i| {
            TableDescriptor::new(
                format!("t{i}"),
                format!("table number {i}"),
                [format!("c{i}_a"), format!("c{i}_b")],
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn strip_code_fence_is_idempotent(raw in ".{0,80}") {
        let once = strip_code_fence(&raw);
        prop_assert_eq!(strip_code_fence(&once), once);
    }

    #[test]
    fn strip_code_fence_is_idempotent_on_fenced_text(
        body in "[a-zA-Z0-9 ;*=\n]{0,60}",
        tag in prop::sample::select(vec!["", "sql", "SQL", "postgresql"]),
    ) {
        let raw = format!("```{tag}\n{body}\n```");
        let once = strip_code_fence(&raw);
        prop_assert!(!once.starts_with("```") && !once.ends_with("```"));
        prop_assert_eq!(strip_code_fence(&once), once);
    }

    #[test]
    fn clamp_stays_in_range(top_k in any::<i64>(), available in 1usize..10_000) {
        let k = clamp_top_k(top_k, available);
        prop_assert!(k >= 1 && k <= available);
    }

    #[test]
    fn retrieve_returns_min_k_n_sorted(n in 1usize..24, k in -4i64..40, query in "[a-z ]{1,30}") {
        prop_assume!(!query.trim().is_empty());
        let rt = runtime();
        let encoder = HashedEncoder::new(64).unwrap();
        let schema = rt
            .block_on(SchemaIndex::build(MetadataSnapshot::new(tables(n)).unwrap(), &encoder))
            .unwrap();

        let hits = rt.block_on(retrieve(&schema, &encoder, &query, k)).unwrap();
        let expected = (k.max(1) as usize).min(n);
        prop_assert_eq!(hits.len(), expected);
        prop_assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        prop_assert!(hits.iter().all(|h| h.distance >= 0.0));
    }

    #[test]
    fn prompt_mentions_only_shortlisted_tables(n in 2usize..12, pick in 1usize..4, question in "[A-Za-z ?]{1,40}") {
        let all = tables(n);
        let shortlist: Vec<&TableDescriptor> = all.iter().take(pick.min(n)).collect();
        let prompt = build_prompt(shortlist.iter().copied(), &question);

        prop_assert!(prompt.contains(&question));
        let mut last = 0;
        for table in &all {
            let line = format!("- Table: {}\n", table.qualified_name);
            let position = prompt.find(&line);
            if shortlist.iter().any(|t| t.qualified_name == table.qualified_name) {
                let position = position.unwrap();
                prop_assert!(position >= last);
                last = position;
            } else {
                prop_assert!(position.is_none());
            }
        }
    }
}
