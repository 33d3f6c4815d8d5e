pub mod position_sizer;

pub use position_sizer::compute;
