// HTTP surface of the panel engine: social preview, downloads, layout and editable view.
pub mod handlers;
