pub(crate) mod backend;
pub(crate) mod image;
pub(crate) mod recycle;
pub(crate) mod scene;
pub(crate) mod shaders;
