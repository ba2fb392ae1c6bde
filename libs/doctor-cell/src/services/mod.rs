pub mod enrichment;
pub mod fetch;
pub mod filter;
pub mod listing;
pub mod query;
pub mod source;
pub mod suggest;

pub use enrichment::{enrich_all, Enricher, ModuloEnricher};
pub use fetch::{FetchOutcome, FetchTask};
pub use listing::ListingView;
pub use query::{MemoryNavigation, NavigationContext, QuerySync};
pub use source::{find_doctor, DoctorSource, HttpDoctorSource, StaticDoctorSource};
pub use suggest::{suggest, SearchBox};
