//! Modify tags use case
//!
//! Orchestrates load, parse, selection, rewrite, rendering and write-back for
//! one Go file.

use crate::application::render::render;
use crate::application::rewrite::{rewrite, RewriteErrors};
use crate::application::select::{resolve, Selection};
use crate::domain::{Modification, OutputFormat, SelectionCriterion};
use crate::error::Result;
use crate::infrastructure::{print, PrintMode, SourceFile, SourceRepository};
use tracing::{debug, info};

/// Options for one modification run
#[derive(Debug, Clone)]
pub struct ModifyOptions {
    /// Path of the Go file, as given on the command line
    pub file: String,

    /// Which fields to touch
    pub criterion: SelectionCriterion,

    /// How their tags change
    pub modification: Modification,

    /// Output format
    pub format: OutputFormat,

    /// Write the rewritten source back to `file`
    pub write: bool,
}

/// Result of a modification run
#[derive(Debug, Clone)]
pub struct ModifyReport {
    /// Rendered output in the requested format
    pub output: String,
    pub selection: Selection,
    /// Per-field failures; the run itself still succeeded
    pub errors: RewriteErrors,
    pub written: bool,
}

/// Service for rewriting struct tags in a single file
pub struct ModifyTagsService<R: SourceRepository> {
    repository: R,
}

impl<R: SourceRepository> ModifyTagsService<R> {
    /// Create new modify tags service
    pub fn new(repository: R) -> Self {
        ModifyTagsService { repository }
    }

    /// Execute the modification
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No operation is requested
    /// - The file cannot be read or is not valid Go
    /// - The selection does not resolve
    /// - Writing back fails
    ///
    /// Failures on individual fields are reported in `ModifyReport::errors`.
    pub fn execute(&self, options: ModifyOptions) -> Result<ModifyReport> {
        // 1. Validate the recipe before touching the file
        options.modification.validate()?;

        // 2. Load and parse
        let content = self.repository.read_source(&options.file)?;
        let mut file = SourceFile::parse(&options.file, content)?;
        debug!(
            file = %options.file,
            structs = file.structs.len(),
            fields = file.fields.len(),
            "parsed source"
        );

        // 3. Resolve selection
        let selection = resolve(&file, &options.criterion)?;

        // 4. Rewrite tags
        let errors = rewrite(&mut file, &selection, &options.modification);

        // 5. Render
        let output = render(&file, &selection, &errors, options.format)?;

        // 6. Write back
        if options.write {
            let source = match options.format {
                OutputFormat::Source => output.clone(),
                OutputFormat::Json => print(&file, PrintMode::Plain),
            };
            self.repository.write_source(&options.file, &source)?;
            info!(file = %options.file, "wrote rewritten source");
        }

        Ok(ModifyReport {
            output,
            selection,
            errors,
            written: options.write,
        })
    }
}
