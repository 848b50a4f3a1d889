pub mod context;
pub mod eye_buffer;
pub mod lines;
pub mod pipelines;
pub mod scene;
pub mod surface;
