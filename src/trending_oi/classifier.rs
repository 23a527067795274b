//! Symbol classification from contract chain metadata

use super::types::{ContractType, SymbolKey, SymbolMeta, SymbolMetaMap};

/// Look up a contract's classification.
///
/// The chain metadata is the only authority; identifiers are never parsed.
/// Unknown contracts return `None` and contribute nothing downstream.
pub fn classify(key: &SymbolKey, metadata: &SymbolMetaMap) -> Option<SymbolMeta> {
    metadata.get(key).copied()
}

/// Contracts of one basket split by type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basket {
    pub calls: Vec<SymbolKey>,
    pub puts: Vec<SymbolKey>,
    pub future: Option<SymbolKey>,
}

impl Basket {
    /// Partition the metadata into calls, puts and the future.
    ///
    /// Options are kept only when `include_strike` accepts their strike. The
    /// future is never strike-filtered; if more than one is present the first
    /// in key order is used.
    pub fn partition<F>(metadata: &SymbolMetaMap, include_strike: F) -> Self
    where
        F: Fn(Option<f64>) -> bool,
    {
        let mut basket = Basket::default();

        for (key, meta) in metadata {
            match meta.contract_type {
                ContractType::Call if include_strike(meta.strike) => basket.calls.push(key.clone()),
                ContractType::Put if include_strike(meta.strike) => basket.puts.push(key.clone()),
                ContractType::Call | ContractType::Put => {}
                ContractType::Future => match &basket.future {
                    None => basket.future = Some(key.clone()),
                    Some(kept) => {
                        tracing::warn!("Multiple futures in basket, keeping {} and ignoring {}", kept, key);
                    }
                },
            }
        }

        basket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(contract_type: ContractType, strike: Option<f64>) -> SymbolMeta {
        SymbolMeta {
            contract_type,
            strike,
        }
    }

    fn sample_metadata() -> SymbolMetaMap {
        let mut map = SymbolMetaMap::new();
        map.insert(SymbolKey::new("NFO", "NIFTY23400CE"), meta(ContractType::Call, Some(23400.0)));
        map.insert(SymbolKey::new("NFO", "NIFTY23500CE"), meta(ContractType::Call, Some(23500.0)));
        map.insert(SymbolKey::new("NFO", "NIFTY23500PE"), meta(ContractType::Put, Some(23500.0)));
        map.insert(SymbolKey::new("NFO", "NIFTYFUT"), meta(ContractType::Future, None));
        map
    }

    #[test]
    fn test_classify_known_and_unknown() {
        let metadata = sample_metadata();

        let known = classify(&SymbolKey::new("NFO", "NIFTY23500PE"), &metadata).unwrap();
        assert_eq!(known.contract_type, ContractType::Put);
        assert_eq!(known.strike, Some(23500.0));

        assert!(classify(&SymbolKey::new("NFO", "BANKNIFTYFUT"), &metadata).is_none());
        // Same symbol on another exchange is a different contract
        assert!(classify(&SymbolKey::new("BFO", "NIFTYFUT"), &metadata).is_none());
    }

    #[test]
    fn test_partition_with_strike_filter() {
        let metadata = sample_metadata();
        let basket = Basket::partition(&metadata, |strike| strike == Some(23500.0));

        assert_eq!(basket.calls, vec![SymbolKey::new("NFO", "NIFTY23500CE")]);
        assert_eq!(basket.puts, vec![SymbolKey::new("NFO", "NIFTY23500PE")]);
        assert_eq!(basket.future, Some(SymbolKey::new("NFO", "NIFTYFUT")));
    }

    #[test]
    fn test_partition_agrees_with_classify() {
        let metadata = sample_metadata();
        let basket = Basket::partition(&metadata, |_| true);

        for key in &basket.calls {
            assert_eq!(classify(key, &metadata).unwrap().contract_type, ContractType::Call);
        }
        for key in &basket.puts {
            assert_eq!(classify(key, &metadata).unwrap().contract_type, ContractType::Put);
        }
        assert_eq!(basket.calls.len() + basket.puts.len() + 1, metadata.len());
    }

    #[test]
    fn test_partition_keeps_first_future() {
        let mut metadata = sample_metadata();
        metadata.insert(SymbolKey::new("NFO", "NIFTYAFUT"), meta(ContractType::Future, None));

        let basket = Basket::partition(&metadata, |_| true);
        assert_eq!(basket.future, Some(SymbolKey::new("NFO", "NIFTYAFUT")));
        assert_eq!(basket.calls.len(), 2);
    }
}
