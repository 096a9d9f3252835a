pub mod location;
pub mod nonlinear_property;
pub mod profile;
pub mod response_spectrum;
pub mod soil_type;
pub mod sub_layer;
pub mod velocity_layer;
