pub mod apply;
pub mod replay;
pub mod simulate;
