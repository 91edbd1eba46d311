pub(crate) mod batch;
pub(crate) mod compiler;
pub(crate) mod fingerprint;
