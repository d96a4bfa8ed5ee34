//! IO side of the Open Assistant client: HTTP calls, page text, cache file and docs index.
mod api;
mod ask;
mod cache;
mod decode;
mod docs;
mod engine;
mod fetch;
mod markdown;
mod page;
mod page_text;
mod persist;
mod types;

pub use api::{ApiError, ReqwestTaskApi, TaskApi, NEW_RANKING_TASK_PATH, UPDATE_TASK_PATH};
pub use ask::{AskClient, AskError, ReqwestAskClient, DEFAULT_ASK_ENDPOINT};
pub use cache::{CacheError, ConfigCacheStore, DEFAULT_CACHE_FILE};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use docs::{load_docs_index, parse_docs_bundle, DocsError};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, NullProgressSink, ProgressSink, ReqwestFetcher};
pub use markdown::DeferredMarkdown;
pub use page::load_page;
pub use page_text::{ExtractedText, VisibleTextExtractor};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FetchProgress, PageSource,
    PageText, RequestId,
};
