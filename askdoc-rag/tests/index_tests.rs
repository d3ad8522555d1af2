//! Vector index contract: ordering, determinism, tie-breaking, bounds,
//! and dimension enforcement.

use askdoc_rag::{Chunk, EmbeddedChunk, InMemoryIndex, RagError, VectorIndex};
use proptest::prelude::*;

fn embedded(tag: &str, vector: Vec<f64>) -> EmbeddedChunk {
    EmbeddedChunk {
        chunk: Chunk {
            text: format!("chunk {tag}"),
            source_name: "doc.pdf".to_string(),
            page_number: 0,
            chunk_index: 0,
        },
        vector,
    }
}

/// Generate a non-zero L2-normalized vector of the given dimension.
fn arb_unit_vector(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0f64..1.0, dim).prop_filter_map("non-zero vector", |mut v| {
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for x in &mut v {
            *x /= norm;
        }
        Some(v)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search returns at most `k` results ordered by descending score,
    /// with valid ids.
    #[test]
    fn search_orders_descending_and_bounds_k(
        vectors in proptest::collection::vec(arb_unit_vector(8), 1..20),
        query in arb_unit_vector(8),
        k in 0usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let results = rt.block_on(async {
            let index = InMemoryIndex::new();
            for (i, v) in vectors.iter().enumerate() {
                let id = index.insert(embedded(&i.to_string(), v.clone())).await.unwrap();
                assert_eq!(id, i);
            }
            index.search(&query, k).await.unwrap()
        });

        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= vectors.len());
        for pair in results.windows(2) {
            prop_assert!(
                pair[0].1 >= pair[1].1,
                "results not in descending order: {} < {}",
                pair[0].1,
                pair[1].1,
            );
        }
        for (id, _) in &results {
            prop_assert!(*id < vectors.len());
        }
    }
}

#[tokio::test]
async fn exact_match_ranks_first_with_unit_score() {
    let index = InMemoryIndex::new();
    index.insert(embedded("a", vec![1.0, 0.0, 0.0])).await.unwrap();
    index.insert(embedded("b", vec![0.0, 1.0, 0.0])).await.unwrap();
    index.insert(embedded("c", vec![0.6, 0.8, 0.0])).await.unwrap();

    let results = index.search(&[0.0, 1.0, 0.0], 3).await.unwrap();
    assert_eq!(results[0].0, 1);
    assert!((results[0].1 - 1.0).abs() < 1e-12);
    assert!(results[0].1 > results[1].1);
}

#[tokio::test]
async fn search_is_deterministic() {
    let index = InMemoryIndex::new();
    index.insert(embedded("a", vec![0.9, 0.1])).await.unwrap();
    index.insert(embedded("b", vec![0.5, 0.5])).await.unwrap();
    index.insert(embedded("c", vec![0.1, 0.9])).await.unwrap();

    let query = [0.7, 0.3];
    let first = index.search(&query, 3).await.unwrap();
    let second = index.search(&query, 3).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn equal_scores_break_ties_by_insertion_id() {
    let index = InMemoryIndex::new();
    for tag in ["a", "b", "c"] {
        index.insert(embedded(tag, vec![0.0, 1.0])).await.unwrap();
    }

    let results = index.search(&[0.0, 1.0], 2).await.unwrap();
    let ids: Vec<usize> = results.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![0, 1]);
}

#[tokio::test]
async fn zero_k_and_empty_index_yield_empty_results() {
    let index = InMemoryIndex::new();
    assert!(index.search(&[1.0, 0.0], 5).await.unwrap().is_empty());

    index.insert(embedded("a", vec![1.0, 0.0])).await.unwrap();
    assert!(index.search(&[1.0, 0.0], 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn k_larger_than_index_is_clamped() {
    let index = InMemoryIndex::new();
    index.insert(embedded("a", vec![1.0, 0.0])).await.unwrap();
    index.insert(embedded("b", vec![0.0, 1.0])).await.unwrap();

    let results = index.search(&[1.0, 0.0], 50).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn mismatched_dimensions_are_rejected() {
    let index = InMemoryIndex::new();
    index.insert(embedded("a", vec![1.0, 0.0, 0.0])).await.unwrap();

    let inserted = index.insert(embedded("b", vec![1.0, 0.0])).await;
    assert!(matches!(inserted, Err(RagError::Index(_))));

    let searched = index.search(&[1.0, 0.0], 1).await;
    assert!(matches!(searched, Err(RagError::Index(_))));
}

#[tokio::test]
async fn get_maps_ids_back_to_chunks() {
    let index = InMemoryIndex::new();
    let id = index.insert(embedded("a", vec![1.0, 0.0])).await.unwrap();

    let chunk = index.get(id).await.unwrap();
    assert_eq!(chunk.text, "chunk a");
    assert!(matches!(index.get(99).await, Err(RagError::Index(_))));
}

#[tokio::test]
async fn zero_magnitude_vectors_score_zero() {
    let index = InMemoryIndex::new();
    index.insert(embedded("zero", vec![0.0, 0.0])).await.unwrap();
    index.insert(embedded("unit", vec![1.0, 0.0])).await.unwrap();

    let results = index.search(&[1.0, 0.0], 2).await.unwrap();
    assert_eq!(results[0].0, 1);
    assert_eq!(results[1].1, 0.0);
}
