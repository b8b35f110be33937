//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod clock;
pub mod confirmation;
pub mod content_source;
pub mod events;
pub mod provider_context;
pub mod providers;
pub mod state_repository;

pub use clock::{Clock, Interrupted};
pub use confirmation::{AssumeYes, Confirmer};
pub use content_source::{ContentError, ContentSource, LocalObject};
pub use events::{NoopEventSink, ProvisionEvent, ProvisionEventSink};
pub use provider_context::ProviderContext;
pub use providers::{
    CdnProvider, CertificateProvider, DnsProvider, HostingProvider, ObjectUpload, ProviderError,
    ProviderResult, Providers, RemoteObject,
};
pub use state_repository::{StateError, StateRepository};
