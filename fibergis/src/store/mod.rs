//! Store access: spatial queries and CRUD collaborators

pub mod buildings;
pub mod predispositions;
pub mod tfo;
