pub(crate) mod placement;
pub(crate) mod width;
