pub(crate) mod capture;
pub(crate) mod composer;
pub(crate) mod pipeline;
pub(crate) mod point_light;
