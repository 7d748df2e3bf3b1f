pub mod controller;
pub mod encoder;
pub mod normalizer;
pub mod transport;
pub mod validation;
