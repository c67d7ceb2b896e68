//! Service layer: local filesystem storage and remote-URL fetching.

pub mod fetch_service;
pub mod storage_service;

use fetch_service::FetchService;
use storage_service::StorageService;

/// Shared state handed to every handler.
///
/// Both members are cheap to clone; the storage root path is the only
/// state shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub storage: StorageService,
    pub fetcher: FetchService,
}

impl AppState {
    pub fn new(storage: StorageService, fetcher: FetchService) -> Self {
        Self { storage, fetcher }
    }
}
