//! Verifier configuration

/// Options controlling how much the verifier checks and reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Collect diagnostics (certificate details) into entry reports
    pub debug: bool,
    /// Cross-check the signed tree head attached to an inclusion proof
    /// against the proof's tree size and root hash
    pub verify_checkpoint: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            debug: false,
            verify_checkpoint: true,
        }
    }
}

impl VerifyConfig {
    /// Enable or disable diagnostics
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Skip the signed tree head cross-check on inclusion proofs
    pub fn skip_checkpoint(mut self) -> Self {
        self.verify_checkpoint = false;
        self
    }
}
