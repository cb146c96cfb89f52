pub(super) mod common;

mod overrides;
mod properties;
mod routing;
