// Application layer: the access draft store, its commands and host-side validation
pub mod access_matrix;
pub mod commands;
pub mod validators;
