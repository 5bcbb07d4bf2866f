pub mod interp;
pub mod noise;
pub mod sampling;
