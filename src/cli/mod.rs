mod output_writer;
mod prompt_loader;
mod validators;

pub use output_writer::write_output;
pub use prompt_loader::load_prompt;
pub use validators::{
    validate_budget, validate_file_exists, validate_positive_u64, validate_structured_file,
};
