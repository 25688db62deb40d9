//! Security domain types.

use serde::Serialize;

/// Parameters for Security.setIgnoreCertificateErrors.
#[derive(Debug, Clone, Serialize)]
pub struct SetIgnoreCertificateErrorsParams {
    /// Whether all certificate errors should be ignored.
    pub ignore: bool,
}
