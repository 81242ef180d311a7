//! Rust source rendering, one function per artifact kind.

mod component;
mod expr;
mod factory;
mod module;
mod provider;

pub(crate) use component::emit_component;
pub(crate) use factory::emit_factory;
pub(crate) use module::emit_module_root;
pub(crate) use provider::emit_provider;
