pub mod angle;
pub mod back_angle;
pub mod frame_clock;
pub mod joint;
pub mod landmark_decoder;
pub mod utils;
pub mod verdict;
