// Tailoring: merging candidate answers into a resume and regenerating it for a job.
// Sections are regenerated concurrently and assembled deterministically.

pub mod achievements;
pub mod handlers;
pub mod merger;
pub mod prompts;
pub mod regenerator;
