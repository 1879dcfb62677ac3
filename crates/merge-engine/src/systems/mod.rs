pub mod sdf_render;
