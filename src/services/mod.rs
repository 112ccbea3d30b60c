pub mod clipper;
