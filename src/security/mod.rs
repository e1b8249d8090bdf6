mod path;

#[cfg(test)]
mod path_tests;

pub use path::sanitize_tree_path;
