//! Custom Prometheus collectors, registered next to the default HTTP
//! metrics at startup.

use lazy_static::lazy_static;
use prometheus::{IntCounterVec, Opts};

lazy_static! {
    /// Documents generated, labeled by template kind and outcome.
    pub static ref DOCUMENTS_GENERATED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "documents_generated_total",
            "Generated documents by kind and outcome"
        ),
        &["kind", "outcome"],
    )
    .expect("valid metric definition");
}
