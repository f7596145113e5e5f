pub mod pse;
