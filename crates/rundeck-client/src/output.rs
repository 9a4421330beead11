//! Renderers for job listings and job definitions.

use std::io::{self, Write};

use crate::model::{Job, JobDefinition};

/// Write the `help jobs` listing.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_job_list<W: Write>(out: &mut W, jobs: &[Job]) -> io::Result<()> {
    writeln!(out, "available jobs:")?;
    for job in jobs {
        writeln!(out)?;
        writeln!(out, "\t {}", job.label)?;
        for line in job.description.split('\n') {
            writeln!(out, "\t\t {line}")?;
        }
    }
    out.flush()
}

/// Write the `help job <name>` detail view.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_job_definition<W: Write>(out: &mut W, definition: &JobDefinition) -> io::Result<()> {
    writeln!(out, "{}", definition.label)?;
    writeln!(out, "\t {}", definition.description)?;
    writeln!(out)?;
    writeln!(out, "\toptions")?;
    for option in &definition.options {
        writeln!(out, "\t\t{} ({})", option.name, requirement(option.required))?;
        writeln!(out, "\t\t\t {}", option.description)?;
    }
    out.flush()
}

#[must_use]
const fn requirement(required: bool) -> &'static str {
    if required { "required" } else { "optional" }
}
