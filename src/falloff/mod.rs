pub(crate) mod curve;
pub(crate) mod gradient;
pub(crate) mod lookup;
