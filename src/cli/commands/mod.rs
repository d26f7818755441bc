pub mod category;
pub mod config;
pub mod day;
pub mod note;
pub mod settings;
pub mod stats;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(day::definitions())
        .chain(note::definitions())
        .chain(category::definitions())
        .chain(stats::definitions())
        .chain(settings::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}
