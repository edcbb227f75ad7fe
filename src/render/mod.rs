pub(crate) mod backend;
pub(crate) mod camera;
pub(crate) mod material;
pub(crate) mod pool;
pub(crate) mod surface;
