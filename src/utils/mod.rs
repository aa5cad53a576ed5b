pub mod slotvec;
