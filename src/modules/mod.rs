pub mod books;

use shelf_kernel::ModuleRegistry;

/// Register all service modules with the registry.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(books::create_module());
}
