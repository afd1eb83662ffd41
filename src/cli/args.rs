use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tyshape_emitter::NativeTarget;

/// Command-line arguments for the `tyshape` binary.
#[derive(Parser, Debug)]
#[command(
    name = "tyshape",
    version,
    about = "Parse, compare and render PHP docblock types"
)]
pub struct CliArgs {
    /// Language version native declarations are rendered for.
    #[arg(long, global = true, value_name = "MAJOR.MINOR", default_value_t = NativeTarget::default())]
    pub target: NativeTarget,

    /// Maximum nesting depth accepted in a type annotation.
    #[arg(long, global = true, value_name = "DEPTH")]
    pub max_depth: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Parse a type annotation and print its canonical form.
    Parse {
        /// The annotation, e.g. `array{id: int, tags?: list<string>}`.
        #[arg(value_name = "TYPE")]
        ty: String,

        /// Template in scope, as `T` or `T:BOUND`. Repeatable.
        #[arg(long = "template", value_name = "NAME[:BOUND]")]
        templates: Vec<String>,

        /// Class that `self` and `static` refer to.
        #[arg(long = "self", value_name = "CLASS")]
        self_class: Option<String>,

        /// Print a JSON description instead of the canonical text.
        #[arg(long)]
        json: bool,
    },

    /// Check whether a value of type CHILD may be used where PARENT is expected.
    Check {
        #[arg(value_name = "CHILD")]
        child: String,

        #[arg(value_name = "PARENT")]
        parent: String,

        /// Declaration manifest providing class hierarchy and variance.
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Render a type as a native parameter or return declaration.
    Syntax {
        #[arg(value_name = "TYPE")]
        ty: String,

        /// Namespace the declaration appears in.
        #[arg(long, default_value = "")]
        namespace: String,

        /// Render for a return position instead of a parameter.
        #[arg(long = "return")]
        return_position: bool,
    },

    /// Render a literal type as a default-value expression.
    Default {
        #[arg(value_name = "TYPE")]
        ty: String,
    },

    /// Generate a stub file from a declaration manifest.
    Stubs {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Write the stubs to FILE instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
