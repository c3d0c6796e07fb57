pub mod key;
pub mod s2k;
