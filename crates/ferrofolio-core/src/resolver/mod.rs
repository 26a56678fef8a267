//! Instrument resolution.
//!
//! Turns a weak identifier tuple into a confirmed symbol by asking the
//! lookup service with the ISIN, then the ticker, then the name, and taking
//! the first candidate quoted in the expected currency.

mod cache;
mod lookup;

pub use cache::ResolutionCache;
pub use lookup::{LookupCandidate, LookupClient};

use tracing::debug;

use crate::domain::{currency_matches, DataSource, InstrumentQuery, SecurityReference};
use crate::error::RemoteError;

#[derive(Debug)]
pub struct InstrumentResolver {
    lookup: LookupClient,
}

impl InstrumentResolver {
    pub fn new(lookup: LookupClient) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &LookupClient {
        &self.lookup
    }

    /// Resolves one query. `Ok(None)` is a clean no-match; errors mean the
    /// lookup service itself failed.
    ///
    /// Queries with an ISIN consult and fill `cache`; misses are never cached.
    pub async fn resolve(
        &self,
        query: &InstrumentQuery,
        cache: &mut ResolutionCache,
    ) -> Result<Option<SecurityReference>, RemoteError> {
        if let Some(isin) = query.isin() {
            if let Some(security) = cache.get(isin) {
                debug!(isin, symbol = security.symbol(), "resolution cache hit");
                return Ok(Some(security));
            }
        }

        for (key, term) in query.cascade() {
            let candidates = self.lookup.search(term).await?;
            debug!(
                key = key.as_str(),
                term,
                candidates = candidates.len(),
                "lookup step"
            );

            let matched = candidates.into_iter().find(|candidate| {
                !candidate.symbol.trim().is_empty()
                    && currency_matches(&candidate.currency, query.expected_currency())
            });

            if let Some(candidate) = matched {
                let security =
                    SecurityReference::new(candidate.symbol, candidate.currency, DataSource::External);
                if let Some(isin) = query.isin() {
                    cache.insert(isin, security.clone());
                }
                return Ok(Some(security));
            }
        }

        Ok(None)
    }
}
