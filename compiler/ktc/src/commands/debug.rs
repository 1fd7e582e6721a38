//! Inspection commands: `lex` and `parse`.

use std::io::Write;

use kt_diagnostic::Diagnostic;
use kt_parse::{EmbeddedError, Parse, SyntaxTree};
use tracing::debug;

use super::{report, Io};
use crate::{CliError, CliOptions, Outcome};

/// Print the token stream, one token per line.
#[tracing::instrument(level = "debug", skip_all, fields(path = %options.path))]
pub fn lex_source<O: Write>(options: &CliOptions, source: &str, out: &mut O) -> Outcome {
    let tokens = kt_lexer::lex(source);
    let _ = writeln!(out, "Tokens for '{}' ({} tokens):", options.path, tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let _ = writeln!(out, "  {:?} @ {} {:?}", token.kind, token.span, tokens.text(index));
    }
    Outcome::Clean
}

/// Print the tree dump, optionally every deferred region's tree after it,
/// then report diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(path = %options.path))]
pub fn parse_source<O: Write, E: Write>(
    options: &CliOptions,
    source: &str,
    io: &mut Io<O, E>,
) -> Result<Outcome, CliError> {
    let parse = kt_parse::parse_with(kt_lexer::lex(source), &options.parse_options())?;
    let _ = write!(io.out, "{}", parse.tree().debug_dump());

    let mut diagnostics = parse.diagnostics().to_vec();
    if options.expand_docs {
        expand(&parse, &mut io.out, &mut diagnostics)?;
    }
    diagnostics.sort_by_key(|diagnostic: &Diagnostic| {
        diagnostic.primary_span().map_or(0, |span| span.start)
    });
    Ok(report(options, source, &diagnostics, &mut io.err, io.is_tty))
}

/// Dump every deferred region of `parse`, and the regions nested in those.
fn expand<O: Write>(
    parse: &Parse,
    out: &mut O,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), CliError> {
    let tree: &SyntaxTree = parse.tree();
    for token in tree.deferred_tokens() {
        let embedded = tree
            .parse_embedded(token)
            .map_err(|error| match error {
                EmbeddedError::Tree(inner) => CliError::Contract(inner),
                other @ EmbeddedError::NotDeferred { .. } => {
                    CliError::Usage(format!("cannot expand {other}"))
                }
            })?;
        debug!(?token, diagnostics = embedded.diagnostics().len(), "expanded region");
        let _ = writeln!(
            out,
            "\n{:?}@{}:",
            tree.token_kind(token),
            tree.token_span(token)
        );
        let _ = write!(out, "{}", embedded.tree().debug_dump());
        let region = tree.token_span(token);
        diagnostics.extend(embedded.diagnostics().iter().map(|diagnostic| {
            diagnostic
                .clone()
                .with_secondary_label(region, "in this doc comment")
        }));
        expand(&embedded, out, diagnostics)?;
    }
    Ok(())
}
