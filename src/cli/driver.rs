use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use tracing::{debug, info_span};
use tyshape_emitter::{NativeTypePrinter, TypePosition, generate_stubs, to_literal_expression};
use tyshape_parser::{ParserConfig, TypeParseError, TypeScope, parse_type_in_scope};
use tyshape_solver::{Codebase, TUnion, TypeFormatter, explain_containment};

use crate::cli::args::{CliArgs, Command};
use crate::cli::manifest::load_manifest;

/// Run one command, writing its result to `out`.
///
/// Returns `false` when the command ran but its answer is negative (a
/// `check` that found no containment); the binary maps that to exit code 1.
pub fn run(args: &CliArgs, out: &mut dyn Write) -> Result<bool> {
    let config = parser_config(args);

    match &args.command {
        Command::Parse {
            ty,
            templates,
            self_class,
            json,
        } => {
            let scope = build_scope(templates, self_class.as_deref(), &config)?;
            let union = parse_annotation(ty, &config, &scope)?;
            let formatted = TypeFormatter::new().format_union(&union);
            if *json {
                let description = serde_json::json!({
                    "type": formatted,
                    "id": union.get_id(),
                    "atomics": union.iter().map(|atomic| atomic.get_id()).collect::<Vec<_>>(),
                    "nullable": union.is_nullable(),
                    "explicit_nullable": union.is_explicit_nullable(),
                });
                let rendered = serde_json::to_string_pretty(&description)?;
                writeln!(out, "{rendered}")?;
            } else {
                writeln!(out, "{formatted}")?;
            }
            Ok(true)
        }

        Command::Check {
            child,
            parent,
            manifest,
        } => {
            let codebase = match manifest {
                Some(path) => load_manifest(path)?.build_codebase(&config),
                None => Codebase::empty(),
            };
            let scope = TypeScope::default();
            let child = parse_annotation(child, &config, &scope)?;
            let parent = parse_annotation(parent, &config, &scope)?;

            let _span = info_span!("check", child = %child, parent = %parent).entered();
            match explain_containment(&codebase, &child, &parent) {
                None => {
                    writeln!(out, "contained")?;
                    Ok(true)
                }
                Some(failure) => {
                    writeln!(out, "not contained: {failure}")?;
                    Ok(false)
                }
            }
        }

        Command::Syntax {
            ty,
            namespace,
            return_position,
        } => {
            let union = parse_annotation(ty, &config, &TypeScope::default())?;
            let position = if *return_position {
                TypePosition::Return
            } else {
                TypePosition::Parameter
            };
            let native = NativeTypePrinter::new(namespace, args.target).print(&union, position)?;
            debug!(exact = native.exact, "native declaration");
            writeln!(out, "{}", native.text)?;
            Ok(true)
        }

        Command::Default { ty } => {
            let union = parse_annotation(ty, &config, &TypeScope::default())?;
            writeln!(out, "{}", to_literal_expression(&union))?;
            Ok(true)
        }

        Command::Stubs { manifest, output } => {
            let codebase = load_manifest(manifest)?.build_codebase(&config);
            let stubs = generate_stubs(&codebase, args.target)?;
            match output {
                Some(path) => std::fs::write(path, stubs)
                    .with_context(|| format!("failed to write stubs to {}", path.display()))?,
                None => out.write_all(stubs.as_bytes())?,
            }
            Ok(true)
        }
    }
}

fn parser_config(args: &CliArgs) -> ParserConfig {
    let mut config = ParserConfig::default();
    if let Some(depth) = args.max_depth {
        config.max_nesting_depth = depth;
    }
    config
}

/// Scope from `--template NAME[:BOUND]` flags, in the order given.
fn build_scope(
    templates: &[String],
    self_class: Option<&str>,
    config: &ParserConfig,
) -> Result<TypeScope> {
    let mut scope = TypeScope::new();
    if let Some(class) = self_class {
        scope = scope.with_self_class(class);
    }
    for template in templates {
        let (name, bound) = match template.split_once(':') {
            Some((name, bound)) => (name.trim(), parse_annotation(bound.trim(), config, &scope)?),
            None => (template.trim(), TUnion::mixed()),
        };
        if name.is_empty() {
            bail!("template `{template}` has no name");
        }
        scope = scope.with_template(name, "cli", bound);
    }
    Ok(scope)
}

fn parse_annotation(text: &str, config: &ParserConfig, scope: &TypeScope) -> Result<TUnion> {
    parse_type_in_scope(text, config, scope).map_err(|err| anyhow!(describe_parse_error(text, &err)))
}

/// The error followed by the annotation with a caret under the offset.
pub fn describe_parse_error(text: &str, err: &TypeParseError) -> String {
    let offset = (err.offset() as usize).min(text.len());
    let column = text
        .get(..offset)
        .map_or(offset, |prefix| prefix.chars().count());
    format!("{err}\n  {text}\n  {}^", " ".repeat(column))
}
