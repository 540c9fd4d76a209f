// Fri Oct 16 2026 - Alex

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vtable-layout")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "C++ class layout, vtable and virtual dispatch resolver", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file with ABI parameters and engine switches.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the memory layout of classes.
    Layout(LayoutArgs),
    /// Print the vtables of classes.
    Vtables(ClassArgs),
    /// Resolve a method call through a view of an object.
    Resolve(ResolveArgs),
    /// Layouts, vtables and construction order of every class.
    Dump(DumpArgs),
    /// Build and check every class.
    Validate(InputArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InputArgs {
    /// Hierarchy description (JSON). Defaults to the built-in reference hierarchy.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ClassArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Classes to show; all when empty.
    pub classes: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub class: ClassArgs,

    /// Show the base-subobject layout, without virtual bases.
    #[arg(long)]
    pub as_base: bool,

    #[arg(long)]
    pub subobjects: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Dynamic type of the complete object.
    pub class: String,

    pub method: String,

    /// Steps from the object to the view: a base class name, or `.member`.
    #[arg(short, long, value_delimiter = ',')]
    pub path: Vec<String>,

    /// Make a qualified call `Qualifier::method`.
    #[arg(long)]
    pub qualified: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InputArgs {
    pub fn validate(&self) -> Result<(), String> {
        match &self.input {
            Some(path) if !path.exists() => Err(format!("Input file does not exist: {:?}", path)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let args = Args::try_parse_from([
            "vtable-layout",
            "--no-color",
            "resolve",
            "E",
            "f",
            "--path",
            ".b,A",
            "--json",
        ])
        .unwrap();
        assert!(args.no_color);
        match args.command {
            Command::Resolve(resolve) => {
                assert_eq!(resolve.class, "E");
                assert_eq!(resolve.path, vec![".b", "A"]);
                assert!(resolve.input.json);
                assert!(resolve.qualified.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_file() {
        let input = InputArgs {
            input: Some(PathBuf::from("/nonexistent/hierarchy.json")),
            json: false,
        };
        assert!(input.validate().is_err());
    }
}
