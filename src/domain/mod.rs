// Domain layer: section models and the collaborator ports the renderer depends on.

pub mod model;
pub mod ports;
