// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    RunConfig, load_seeds_from_file, map_seed, output_path_for, resolve_seed_path,
};
