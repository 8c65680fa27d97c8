//! Synchronization for dep.
//!
//! A remote is a history store addressed by `handle/repo`. Sync works one
//! branch at a time and only ever moves whole commit objects:
//!
//! - **fetch** mirrors the remote branch into `history/remote/<branch>/`
//! - **pull** fetches, appends the new commits to the local branch and
//!   checks it out
//! - **push** uploads local commits the remote does not have
//! - **clone** creates a repository from a remote's root snapshot and
//!   `main` history
//!
//! Transports implement [`RemoteTransport`]; [`HttpTransport`] talks JSON
//! over HTTP and [`InMemoryRemote`] backs tests.

pub mod error;
pub mod http;
pub mod memory;
pub mod negotiation;
pub mod ops;
pub mod transport;
pub mod types;

pub use error::{SyncError, SyncResult};
pub use http::HttpTransport;
pub use memory::InMemoryRemote;
pub use negotiation::NegotiationEngine;
pub use ops::{clone, fetch, pull, push};
pub use transport::RemoteTransport;
pub use types::{
    remote_host, resolve_remote_url, CloneResult, FetchResult, PullResult, PushResult, RemoteRef,
    DEFAULT_HOST, HOST_ENV,
};
