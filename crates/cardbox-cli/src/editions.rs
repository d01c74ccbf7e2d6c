//! Edition resolution through the Scryfall client.

use std::cell::RefCell;
use std::time::SystemTime;

use cardbox::Edition;
use cardbox_engine::{EditionResolver, Error, Result};
use cardbox_scryfall::{EditionCache, ScryfallClient, Set};
use tracing::debug;

/// Resolves unknown edition codes against the Scryfall set list.
///
/// The reconciliation engine is synchronous, so the resolver owns its own
/// runtime and blocks on each fetch. The full set list is fetched once per
/// process into an [`EditionCache`]; codes missing from it (brand-new sets)
/// fall back to a direct lookup.
pub struct ScryfallResolver {
    client: ScryfallClient,
    runtime: tokio::runtime::Runtime,
    cache: RefCell<Option<EditionCache>>,
}

impl ScryfallResolver {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let mut builder = ScryfallClient::builder();
        if let Some(url) = base_url {
            builder = builder.url(url);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            client: builder.build(),
            runtime,
            cache: RefCell::new(None),
        })
    }

    fn cached_set(&self, code: &str) -> Result<Option<Set>> {
        let mut cache = self.cache.borrow_mut();
        if cache.is_none() {
            debug!("fetching the Scryfall set list");
            let sets = self
                .runtime
                .block_on(self.client.sets())
                .map_err(|e| lookup_error(code, e))?;
            *cache = Some(EditionCache::new(sets, SystemTime::now()));
        }
        Ok(cache
            .as_ref()
            .and_then(|c| c.find(code))
            .cloned())
    }
}

impl EditionResolver for ScryfallResolver {
    fn resolve(&self, code: &str) -> Result<Edition> {
        debug!(%code, "looking up edition on Scryfall");
        let set = match self.cached_set(code)? {
            Some(set) => set,
            // Not in the cached list; the set may be newer than the list.
            None => self
                .runtime
                .block_on(self.client.set(code))
                .map_err(|e| lookup_error(code, e))?,
        };
        Ok(Edition {
            code: set.code,
            name: set.name,
            released_at: set.released_at,
        })
    }
}

fn lookup_error(code: &str, source: cardbox_scryfall::Error) -> Error {
    Error::EditionLookup {
        code: code.to_string(),
        reason: source.to_string(),
    }
}
