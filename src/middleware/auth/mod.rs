mod scheme_guard;

pub use scheme_guard::require;
