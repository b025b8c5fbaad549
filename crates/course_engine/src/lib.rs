//! Harvester engine: HTTP transport, crawling, content normalization and the
//! ingestion run that ties them to the filesystem.
mod config;
mod convert;
mod crawler;
mod discover;
mod filename;
mod ledger_store;
mod materialize;
mod normalize;
mod orchestrator;
mod persist;
mod rewrite;
mod transport;
mod types;

pub use config::{
    utc_timestamp, Clock, EngineConfig, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE, DEFAULT_SITE_BASE,
    PROGRESS_FILENAME,
};
pub use convert::{atx_headings, Converter, Html2MdConverter};
pub use crawler::Crawler;
pub use discover::{
    MarkdownDiscovery, MarkupDiscovery, ResourceDiscovery, ResourceKind, ResourceRequest,
};
pub use filename::{resource_file_name, NameRegistry};
pub use ledger_store::LedgerStore;
pub use materialize::{MaterializeError, Materialized, Materializer};
pub use normalize::{detect_format, ContentFormat, NormalizedLesson, Normalizer};
pub use orchestrator::{IngestError, Ingestor};
pub use persist::{ensure_dir, write_atomic, PersistError};
pub use rewrite::{localize_image_references, LocalizedMarkdown};
pub use transport::{
    ByteStream, HttpResponse, ReqwestTransport, StreamResponse, Transport, TransportSettings,
};
pub use types::{FailureKind, FetchError, IngestEvent, NoopProgressSink, ProgressSink};
