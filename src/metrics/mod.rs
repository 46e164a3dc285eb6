pub mod dtw;
pub mod hamming;
pub mod lp;
