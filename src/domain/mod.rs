// Domain layer: schedule and contact models plus the collaborator ports.

pub mod model;
pub mod ports;
