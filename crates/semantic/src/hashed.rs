use async_trait::async_trait;
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;
use crate::{Encoder, SemanticConfig, SemanticError};

/// Deterministic feature-hashing sentence encoder.
///
/// Every token is hashed into one of `dimension` signed buckets, so texts that
/// share vocabulary land close together under L2 distance. There is no model
/// file and no network call: identical input always yields identical bits.
#[derive(Debug, Clone)]
pub struct HashedEncoder {
    dimension: usize,
    model_name: String,
    normalize: bool,
}

impl HashedEncoder {
    pub fn new(dimension: usize) -> Result<Self, SemanticError> {
        if dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "embedding dimension must be greater than zero".into(),
            ));
        }
        Ok(Self {
            dimension,
            model_name: format!("hashed-{dimension}"),
            normalize: true,
        })
    }

    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let mut encoder = Self::new(cfg.dimension)?;
        encoder.normalize = cfg.normalize;
        Ok(encoder)
    }

    /// Synchronous form of [`Encoder::encode`]; never fails.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimension];
        for token in tokenize(text) {
            let h = hash64(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

#[async_trait]
impl Encoder for HashedEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        Ok(self.embed(text))
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }
}

/// Lower-cased alphanumeric tokens with a trailing plural `s` folded away,
/// so `customers` and `customer_id` share the `customer` feature.
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| fold_plural(t.to_lowercase()))
}

fn fold_plural(mut token: String) -> String {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        token.pop();
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    #[test]
    fn tokenize_splits_and_folds() {
        let tokens: Vec<String> = tokenize("Stores customers' info: customer_id, ADDRESS").collect();
        assert_eq!(
            tokens,
            vec!["store", "customer", "info", "customer", "id", "address"]
        );
    }

    #[test]
    fn short_words_keep_their_s() {
        let tokens: Vec<String> = tokenize("is has bus").collect();
        assert_eq!(tokens, vec!["is", "has", "bus"]);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            HashedEncoder::new(0),
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[test]
    fn embedding_has_configured_dimension() {
        let encoder = HashedEncoder::new(64).unwrap();
        assert_eq!(encoder.embed("hello world").len(), 64);
        assert_eq!(encoder.dimension(), 64);
    }

    #[test]
    fn embedding_is_deterministic() {
        let encoder = HashedEncoder::new(384).unwrap();
        assert_eq!(encoder.embed("big cat"), encoder.embed("big cat"));
    }

    #[test]
    fn embedding_is_unit_length_when_normalized() {
        let encoder = HashedEncoder::new(384).unwrap();
        let v = encoder.embed("Stores customers information");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm={norm}");
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let encoder = HashedEncoder::new(16).unwrap();
        assert!(encoder.embed("  ,; ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn shared_vocabulary_is_closer() {
        let encoder = HashedEncoder::new(384).unwrap();
        let query = encoder.embed("Which customers spent over 250?");
        let customers =
            encoder.embed("Table: customers. Description: Stores customers information. Columns: customer_id, customer_name, email");
        let employees =
            encoder.embed("Table: employees. Description: Stores company employee information. Columns: employee_id, first_name, hire_date");
        assert!(dist(&query, &customers) < dist(&query, &employees));
    }

    #[test]
    fn unnormalized_counts_repeats() {
        let cfg = SemanticConfig {
            dimension: 32,
            normalize: false,
            ..Default::default()
        };
        let encoder = HashedEncoder::from_config(&cfg).unwrap();
        let v = encoder.embed("order order order");
        let mass: f32 = v.iter().map(|x| x.abs()).sum();
        assert_eq!(mass, 3.0);
    }

    #[tokio::test]
    async fn batch_matches_scalar() {
        let encoder = HashedEncoder::new(128).unwrap();
        let texts = ["orders by customers", "product catalog", ""];
        let batch = encoder.encode_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), texts.len());
        for (vector, text) in batch.iter().zip(texts.iter()) {
            assert_eq!(vector, &encoder.encode(text).await.unwrap());
        }
    }
}
