pub mod error;
pub mod render;

pub use sqlctx_app as app;
pub use sqlctx_domain as domain;
pub use sqlctx_infra as infra;
