pub(crate) mod parity;
pub(crate) mod session;
